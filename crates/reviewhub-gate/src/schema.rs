//! Declarative request validation.
//!
//! # Purpose
//! Describes, per entity operation, which fields each request location must
//! carry and how to word the rejection when they do not. A small evaluator
//! interprets the description; there is no schema language.
//!
//! # Key invariants
//! - Locations are checked in the fixed order body, params, query.
//! - Fields are checked in declaration order.
//! - Evaluation stops at the first violation and reports only that one.
//! - Fields the set does not declare are ignored.
//! - An empty string is rejected even for optional fields.
//! - A set that declares body fields rejects any body that is not an object.
//!
//! # Common pitfalls
//! - Number fields accept numeric strings. Use [`validate_in_place`] when the
//!   coerced number should replace the string in the body.
use crate::policy::Operation;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Body,
    Params,
    Query,
}

impl Location {
    const ORDER: [Location; 3] = [Location::Body, Location::Params, Location::Query];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Body => "Body",
            Location::Params => "Params",
            Location::Query => "Query",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    Required,
    Empty,
    TypeMismatch,
    MinLength,
    Min,
}

/// Rules and custom messages for a single field.
#[derive(Debug, Clone)]
pub struct FieldConstraint {
    required: bool,
    field_type: FieldType,
    min_length: Option<usize>,
    min: Option<f64>,
    messages: HashMap<ViolationKind, String>,
}

impl FieldConstraint {
    fn of(field_type: FieldType) -> Self {
        Self {
            required: false,
            field_type,
            min_length: None,
            min: None,
            messages: HashMap::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn message(mut self, kind: ViolationKind, message: impl Into<String>) -> Self {
        self.messages.insert(kind, message.into());
        self
    }

    fn custom(&self, kind: ViolationKind) -> Option<&str> {
        self.messages.get(&kind).map(String::as_str)
    }

    fn required_message(&self, field: &str) -> String {
        self.custom(ViolationKind::Required)
            .map(str::to_string)
            .unwrap_or_else(|| format!("\"{field}\" is required"))
    }

    fn empty_message(&self, field: &str) -> String {
        self.custom(ViolationKind::Empty)
            .or_else(|| self.custom(ViolationKind::Required))
            .map(str::to_string)
            .unwrap_or_else(|| format!("\"{field}\" is not allowed to be empty"))
    }

    fn string_mismatch_message(&self, field: &str) -> String {
        self.custom(ViolationKind::TypeMismatch)
            .or_else(|| self.custom(ViolationKind::Empty))
            .or_else(|| self.custom(ViolationKind::Required))
            .map(str::to_string)
            .unwrap_or_else(|| format!("\"{field}\" must be a string"))
    }

    fn number_mismatch_message(&self, field: &str) -> String {
        self.custom(ViolationKind::TypeMismatch)
            .map(str::to_string)
            .unwrap_or_else(|| format!("\"{field}\" must be a number"))
    }

    /// Checks one value. `Ok(Some(_))` carries a coerced replacement.
    fn check(&self, field: &str, value: Option<&Value>) -> Result<Option<Value>, String> {
        let value = match value {
            None | Some(Value::Null) => {
                return if self.required {
                    Err(self.required_message(field))
                } else {
                    Ok(None)
                };
            }
            Some(value) => value,
        };
        if matches!(value, Value::String(text) if text.is_empty()) {
            return Err(self.empty_message(field));
        }
        match self.field_type {
            FieldType::String => self.check_string(field, value).map(|()| None),
            FieldType::Number => self.check_number(field, value),
        }
    }

    fn check_string(&self, field: &str, value: &Value) -> Result<(), String> {
        let Value::String(text) = value else {
            return Err(self.string_mismatch_message(field));
        };
        if let Some(min_length) = self.min_length {
            if text.chars().count() < min_length {
                return Err(self
                    .custom(ViolationKind::MinLength)
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!("\"{field}\" length must be at least {min_length} characters long")
                    }));
            }
        }
        Ok(())
    }

    fn check_number(&self, field: &str, value: &Value) -> Result<Option<Value>, String> {
        let (number, coerced) = match value {
            Value::Number(number) => match number.as_f64() {
                Some(number) => (number, None),
                None => return Err(self.number_mismatch_message(field)),
            },
            Value::String(text) => match parse_number(text) {
                Some((number, json)) => (number, Some(json)),
                None => return Err(self.number_mismatch_message(field)),
            },
            _ => return Err(self.number_mismatch_message(field)),
        };
        if let Some(min) = self.min {
            if number < min {
                return Err(self
                    .custom(ViolationKind::Min)
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!("\"{field}\" must be greater than or equal to {min}")
                    }));
            }
        }
        Ok(coerced)
    }
}

fn parse_number(text: &str) -> Option<(f64, Value)> {
    let text = text.trim();
    if let Ok(integer) = text.parse::<i64>() {
        return Some((integer as f64, Value::from(integer)));
    }
    let float = text.parse::<f64>().ok().filter(|value| value.is_finite())?;
    Number::from_f64(float).map(|number| (float, Value::Number(number)))
}

/// Ordered field rules for one entity operation.
#[derive(Debug, Clone, Default)]
pub struct FieldConstraintSet {
    locations: Vec<(Location, Vec<(String, FieldConstraint)>)>,
}

impl FieldConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        location: Location,
        name: impl Into<String>,
        constraint: FieldConstraint,
    ) -> Self {
        let entry = (name.into(), constraint);
        match self.locations.iter_mut().find(|(loc, _)| *loc == location) {
            Some((_, fields)) => fields.push(entry),
            None => self.locations.push((location, vec![entry])),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.locations.iter().all(|(_, fields)| fields.is_empty())
    }

    fn fields_at(&self, location: Location) -> &[(String, FieldConstraint)] {
        self.locations
            .iter()
            .find(|(loc, _)| *loc == location)
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or(&[])
    }
}

/// Request data under validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub body: Value,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
}

impl Default for Candidate {
    fn default() -> Self {
        Self {
            body: Value::Object(Default::default()),
            params: HashMap::new(),
            query: HashMap::new(),
        }
    }
}

impl Candidate {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    fn lookup(&self, location: Location, field: &str) -> Option<Value> {
        match location {
            Location::Body => self.body.get(field).cloned(),
            Location::Params => self.params.get(field).cloned().map(Value::String),
            Location::Query => self.query.get(field).cloned().map(Value::String),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error: {location}: {message}")]
pub struct Violation {
    pub location: Location,
    pub field: String,
    pub message: String,
}

impl Violation {
    pub(crate) fn body_not_object() -> Self {
        Self {
            location: Location::Body,
            field: "value".to_string(),
            message: "\"value\" must be of type object".to_string(),
        }
    }
}

/// Returns the first violation without touching the candidate.
pub fn validate(set: &FieldConstraintSet, candidate: &Candidate) -> Result<(), Violation> {
    evaluate(set, candidate).map(|_| ())
}

/// Validates and writes numeric coercions back into the body.
pub fn validate_in_place(
    set: &FieldConstraintSet,
    candidate: &mut Candidate,
) -> Result<(), Violation> {
    let coercions = evaluate(set, candidate)?;
    if let Value::Object(body) = &mut candidate.body {
        for (field, value) in coercions {
            body.insert(field, value);
        }
    }
    Ok(())
}

fn evaluate(
    set: &FieldConstraintSet,
    candidate: &Candidate,
) -> Result<Vec<(String, Value)>, Violation> {
    let mut coercions = Vec::new();
    for location in Location::ORDER {
        let fields = set.fields_at(location);
        if location == Location::Body && !fields.is_empty() && !candidate.body.is_object() {
            return Err(Violation::body_not_object());
        }
        for (field, constraint) in fields {
            let value = candidate.lookup(location, field);
            match constraint.check(field, value.as_ref()) {
                Ok(Some(coerced)) if location == Location::Body => {
                    coercions.push((field.clone(), coerced));
                }
                Ok(_) => {}
                Err(message) => {
                    return Err(Violation {
                        location,
                        field: field.clone(),
                        message,
                    });
                }
            }
        }
    }
    Ok(coercions)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SchemaKey {
    entity: String,
    operation: Operation,
}

/// Constraint sets keyed by entity and operation, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    sets: HashMap<SchemaKey, Arc<FieldConstraintSet>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        entity: impl Into<String>,
        operation: Operation,
        set: FieldConstraintSet,
    ) {
        let key = SchemaKey {
            entity: entity.into(),
            operation,
        };
        self.sets.insert(key, Arc::new(set));
    }

    pub fn with(
        mut self,
        entity: impl Into<String>,
        operation: Operation,
        set: FieldConstraintSet,
    ) -> Self {
        self.register(entity, operation, set);
        self
    }

    pub fn get(&self, entity: &str, operation: Operation) -> Option<Arc<FieldConstraintSet>> {
        let key = SchemaKey {
            entity: entity.to_string(),
            operation,
        };
        self.sets.get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
