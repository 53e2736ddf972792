//! Request gate primitives shared by the reviewhub API service.
//!
//! # Purpose
//! Centralizes the decision logic every write request must pass before it
//! reaches persistence: bearer-token authentication, role/ownership
//! authorization, profanity filtering, and schema validation.
//!
//! # How it fits
//! The API service declares one [`RoutePolicy`] per route at startup and runs
//! each inbound request through a [`RequestGate`]. Handlers only ever see
//! requests that passed every stage.
//!
//! # Key invariants
//! - Stage order is fixed: authenticate, authorize, then (writes only)
//!   profanity check and schema validation.
//! - The first failing stage short-circuits; later stages never run.
//! - Schema validation surfaces exactly one violation per call.
//! - The lexicon is the only shared mutable state and is append-only.
//!
//! # Important configuration
//! - [`JwtVerifier`] requires the same HS256 secret as the token issuer.
//! - Issuer/audience checks are optional and only applied when configured.
//!
//! # Examples
//! ```rust
//! use reviewhub_gate::{AuthorizationPolicy, Identity, Role, authorize};
//!
//! let caller = Identity::new("1", Role::User);
//! let policy = AuthorizationPolicy::new([Role::Admin]).with_same_user();
//! assert!(authorize(&caller, &policy, Some("1")).is_ok());
//! assert!(authorize(&caller, &policy, Some("2")).is_err());
//! ```
//!
//! # Common pitfalls
//! - Resolving the resource owner is the caller's job; the authorizer never
//!   performs lookups.
//! - Profanity checks skip non-string fields; they are not a type validator.

mod authn;
mod authz;
mod errors;
mod gate;
mod identity;
mod lexicon;
mod policy;
mod profanity;
mod schema;
mod token;

pub use authn::{Authenticator, IdentityVerifier, VerifyError, bearer_token};
pub use authz::{AuthorizationPolicy, authorize};
pub use errors::{GateError, GateResult};
pub use gate::RequestGate;
pub use identity::{Identity, Role, RoleParseError};
pub use lexicon::Lexicon;
pub use policy::{Operation, RoutePolicy};
pub use profanity::check_fields;
pub use schema::{
    Candidate, FieldConstraint, FieldConstraintSet, FieldType, Location, SchemaRegistry,
    Violation, ViolationKind, validate, validate_in_place,
};
pub use token::{IdentityClaims, JwtVerifier};
