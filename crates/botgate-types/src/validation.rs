//! Accumulating field validator.
//!
//! Collects at most one message per field so callers see every violated
//! field at once instead of failing on the first.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::bot::CreateBotRequest;

/// Minimum bot name length in bytes.
pub const NAME_MIN_BYTES: usize = 6;
/// Maximum bot name length in bytes.
pub const NAME_MAX_BYTES: usize = 32;

/// Field name -> message map. The first message recorded for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add_error(field, message);
        }
    }

    /// Finish validation: `Ok(())` when nothing was recorded.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Field rules shared by create and update.
pub fn validate_bot_fields(v: &mut Validator, name: &str, credential: &str) {
    v.check(!name.is_empty(), "name", "must be provided");
    v.check(
        name.len() >= NAME_MIN_BYTES,
        "name",
        format!("must be at least {NAME_MIN_BYTES} bytes long"),
    );
    v.check(
        name.len() <= NAME_MAX_BYTES,
        "name",
        format!("must not be more than {NAME_MAX_BYTES} bytes long"),
    );
    v.check(!credential.is_empty(), "credential", "must be provided");
}

pub fn validate_create_request(v: &mut Validator, req: &CreateBotRequest) {
    validate_bot_fields(v, &req.name, &req.credential);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_errors(name: &str) -> Option<String> {
        let mut v = Validator::new();
        validate_bot_fields(&mut v, name, "token");
        v.finish().err().and_then(|e| e.get("name").map(str::to_string))
    }

    #[test]
    fn test_name_boundaries() {
        assert!(name_errors(&"a".repeat(5)).is_some());
        assert!(name_errors(&"a".repeat(6)).is_none());
        assert!(name_errors(&"a".repeat(32)).is_none());
        assert!(name_errors(&"a".repeat(33)).is_some());
    }

    #[test]
    fn test_name_length_counts_bytes() {
        // 17 chars but 34 bytes
        assert!(name_errors(&"é".repeat(17)).is_some());
        assert!(name_errors(&"é".repeat(3)).is_none());
    }

    #[test]
    fn test_empty_name_reports_first_message() {
        assert_eq!(name_errors("").as_deref(), Some("must be provided"));
    }

    #[test]
    fn test_accumulates_every_field() {
        let mut v = Validator::new();
        validate_bot_fields(&mut v, "abc", "");
        let errs = v.finish().unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.get("name").is_some());
        assert!(errs.get("credential").is_some());
    }

    #[test]
    fn test_first_message_wins() {
        let mut v = Validator::new();
        v.add_error("page", "first");
        v.add_error("page", "second");
        let errs = v.finish().unwrap_err();
        assert_eq!(errs.get("page"), Some("first"));
    }

    #[test]
    fn test_serializes_as_object() {
        let mut v = Validator::new();
        v.add_error("sort", "invalid sort value");
        let json = serde_json::to_value(v.finish().unwrap_err()).unwrap();
        assert_eq!(json, serde_json::json!({"sort": "invalid sort value"}));
    }
}
