//! Bot credential confirmation port and response classification.
//!
//! The transport lives in botgate-infra; how a response body turns into
//! confirmed / unconfirmed is decided here by [`classify`], selected through
//! [`ConfirmationRule`], so the rule can change without touching callers.

use botgate_types::config::ConfirmationRule;
use botgate_types::error::TokenCheckError;
use serde_json::Value;

/// Confirms a bot credential with the external platform.
///
/// `Ok(true)` / `Ok(false)` are answers from the platform. `Err` means no
/// answer was obtained and must not be read as "credential invalid".
pub trait TokenValidator: Send + Sync {
    fn confirm(
        &self,
        credential: &str,
    ) -> impl std::future::Future<Output = Result<bool, TokenCheckError>> + Send;
}

/// Classify a decoded confirmation response.
///
/// The body must be a JSON object; anything else is malformed.
pub fn classify(rule: ConfirmationRule, body: &Value) -> Result<bool, TokenCheckError> {
    let fields = body
        .as_object()
        .ok_or_else(|| TokenCheckError::Malformed("expected a JSON object".to_string()))?;

    let confirmed = match rule {
        ConfirmationRule::AnyTrueField => fields.values().any(|v| v.as_bool() == Some(true)),
        ConfirmationRule::OkField => fields.get("ok").and_then(Value::as_bool) == Some(true),
    };

    Ok(confirmed)
}
