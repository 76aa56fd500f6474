//! HttpTokenValidator -- concrete [`TokenValidator`] backed by the bot platform's
//! `getMe` endpoint.
//!
//! The credential is substituted into the request path as `/bot{credential}/getMe`.
//! It is percent-encoded as a single path segment and never appears in logs or
//! error messages.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde_json::Value;

use botgate_core::credential::{TokenValidator, classify};
use botgate_types::config::{ConfirmationConfig, ConfirmationRule};
use botgate_types::error::TokenCheckError;

/// Confirms bot credentials over HTTP.
pub struct HttpTokenValidator {
    client: reqwest::Client,
    base_url: Url,
    rule: ConfirmationRule,
}

impl HttpTokenValidator {
    /// Build a validator from the `[confirmation]` config section.
    ///
    /// The client timeout bounds the whole exchange, body included.
    pub fn new(config: &ConfirmationConfig) -> Result<Self, TokenCheckError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TokenCheckError::Transport(format!("invalid base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TokenCheckError::Transport(format!(
                "invalid base url: {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TokenCheckError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            client,
            base_url,
            rule: config.rule,
        })
    }

    fn endpoint(&self, credential: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&format!("bot{credential}"))
                .push("getMe");
        }
        url
    }
}

fn transport_error(err: reqwest::Error) -> TokenCheckError {
    if err.is_timeout() {
        TokenCheckError::Timeout
    } else {
        TokenCheckError::Transport(err.without_url().to_string())
    }
}

impl TokenValidator for HttpTokenValidator {
    async fn confirm(&self, credential: &str) -> Result<bool, TokenCheckError> {
        let response = self
            .client
            .get(self.endpoint(credential))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TokenCheckError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| TokenCheckError::Malformed(e.to_string()))?;

        classify(self.rule, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str, rule: ConfirmationRule) -> ConfirmationConfig {
        ConfirmationConfig {
            base_url: base_url.to_string(),
            timeout_ms: 500,
            rule,
        }
    }

    async fn server_answering(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bot123:secret/getMe"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_ok_true_is_confirmed() {
        let server =
            server_answering(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
                .await;
        let validator =
            HttpTokenValidator::new(&config(&server.uri(), ConfirmationRule::AnyTrueField)).unwrap();

        assert!(validator.confirm("123:secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_ok_false_is_unconfirmed() {
        let server =
            server_answering(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
                .await;
        let validator =
            HttpTokenValidator::new(&config(&server.uri(), ConfirmationRule::OkField)).unwrap();

        assert!(!validator.confirm("123:secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Bind then release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let uri = format!("http://{addr}");

        let validator =
            HttpTokenValidator::new(&config(&uri, ConfirmationRule::AnyTrueField)).unwrap();
        let err = validator.confirm("123:secret").await.unwrap_err();
        assert!(matches!(
            err,
            TokenCheckError::Transport(_) | TokenCheckError::Timeout
        ));
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let server = server_answering(
            ResponseTemplate::new(500).set_body_json(json!({"ok": true})),
        )
        .await;
        let validator =
            HttpTokenValidator::new(&config(&server.uri(), ConfirmationRule::AnyTrueField)).unwrap();

        let err = validator.confirm("123:secret").await.unwrap_err();
        assert!(matches!(err, TokenCheckError::Status(500)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server =
            server_answering(ResponseTemplate::new(200).set_body_string("<html>")).await;
        let validator =
            HttpTokenValidator::new(&config(&server.uri(), ConfirmationRule::AnyTrueField)).unwrap();

        let err = validator.confirm("123:secret").await.unwrap_err();
        assert!(matches!(err, TokenCheckError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = server_answering(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .await;
        let validator =
            HttpTokenValidator::new(&config(&server.uri(), ConfirmationRule::AnyTrueField)).unwrap();

        let err = validator.confirm("123:secret").await.unwrap_err();
        assert!(matches!(err, TokenCheckError::Timeout));
    }

    #[test]
    fn test_credential_stays_in_one_path_segment() {
        let validator = HttpTokenValidator::new(&config(
            "https://api.example.org/",
            ConfirmationRule::AnyTrueField,
        ))
        .unwrap();

        let url = validator.endpoint("1:abc/../x?y");
        assert_eq!(url.host_str(), Some("api.example.org"));
        assert!(url.query().is_none());
        assert_eq!(url.path_segments().map(|s| s.count()), Some(2));
        assert!(url.path().ends_with("/getMe"));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HttpTokenValidator::new(&config("not a url", ConfirmationRule::OkField)).is_err());
    }
}
