use crate::{GateError, GateResult, Lexicon};
use serde_json::Value;

/// Checks the named body fields against the lexicon, in order.
///
/// Absent and non-string fields are skipped. The first dirty field ends the
/// scan, so only its name is reported.
pub fn check_fields<S: AsRef<str>>(
    lexicon: &Lexicon,
    body: &Value,
    fields: &[S],
) -> GateResult<()> {
    for field in fields {
        let field = field.as_ref();
        let Some(text) = body.get(field).and_then(Value::as_str) else {
            continue;
        };
        if lexicon.contains_banned(text) {
            return Err(GateError::ProfanityDetected(field.to_string()));
        }
    }
    Ok(())
}
