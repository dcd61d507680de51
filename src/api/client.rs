//! Endpoint client: timeout, status classification and envelope decoding

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{Action, ApiError, ApiRequest, HttpTransport, RawResponse, Transport};
use crate::config::ApiConfig;
use crate::error::Result;

/// Cheap to clone; all clones share one transport
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Build a client posting over HTTP to the configured URL
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.url.clone(), config.timeout())?;
        Ok(Self::new(Arc::new(transport), config.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request and return the decoded `{ success: true, ... }` envelope
    pub async fn call(&self, request: ApiRequest) -> std::result::Result<Value, ApiError> {
        let action = request.action;
        let response = self.send(&request).await?;
        if let Some(err) = classify_status(response.status, &response.body) {
            tracing::debug!(%action, status = response.status, error = %err, "request failed");
            return Err(err);
        }
        decode_envelope(action, &response.body)
    }

    /// Like [`ApiClient::call`], deserializing the envelope into `T`
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<T, ApiError> {
        let envelope = self.call(request).await?;
        serde_json::from_value(envelope).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Send a request whose successful reply is a file rather than an envelope
    pub async fn fetch_bytes(&self, request: ApiRequest) -> std::result::Result<Vec<u8>, ApiError> {
        let action = request.action;
        let response = self.send(&request).await?;
        if let Some(err) = classify_status(response.status, &response.body) {
            return Err(err);
        }
        // A JSON envelope here means the endpoint refused to produce the file
        if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(&response.body) {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(rejection(action, &map));
            }
        }
        Ok(response.body)
    }

    async fn send(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ApiError> {
        tracing::debug!(action = %request.action, request_id = %request.id, "sending request");
        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(action = %request.action, timeout = ?self.timeout, "request timed out");
                Err(ApiError::Timeout)
            }
        }
    }
}

/// Map a non-2xx status onto the error taxonomy; `None` for success statuses
pub fn classify_status(status: u16, body: &[u8]) -> Option<ApiError> {
    match status {
        200..=299 => None,
        500..=u16::MAX => Some(ApiError::Server { status }),
        429 => Some(ApiError::RateLimited),
        0 | 404 => Some(ApiError::Unreachable { status }),
        401 => Some(ApiError::Unauthorized),
        _ => Some(ApiError::Http {
            status,
            message: error_text(body),
        }),
    }
}

/// Decode `{ success, error?, ...payload }`
pub fn decode_envelope(action: Action, body: &[u8]) -> std::result::Result<Value, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(ApiError::Malformed("response is not a JSON object".to_string()));
    };

    match map.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(Value::Object(map)),
        Some(false) => Err(rejection(action, &map)),
        None => Err(ApiError::Malformed("response has no success flag".to_string())),
    }
}

fn rejection(action: Action, map: &serde_json::Map<String, Value>) -> ApiError {
    let message = map
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_rejection(action));
    ApiError::Rejected(message)
}

fn default_rejection(action: Action) -> String {
    match action {
        Action::Login => "Invalid credentials".to_string(),
        Action::Register => "Registration failed".to_string(),
        other => format!("{} failed", other.label()),
    }
}

fn error_text(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(200, b""), None);
        assert_eq!(classify_status(503, b""), Some(ApiError::Server { status: 503 }));
        assert_eq!(classify_status(429, b""), Some(ApiError::RateLimited));
        assert_eq!(classify_status(404, b""), Some(ApiError::Unreachable { status: 404 }));
        assert_eq!(classify_status(0, b""), Some(ApiError::Unreachable { status: 0 }));
        assert_eq!(classify_status(401, b""), Some(ApiError::Unauthorized));
        assert_eq!(
            classify_status(400, br#"{"error":"Email already registered"}"#),
            Some(ApiError::Http {
                status: 400,
                message: Some("Email already registered".into())
            })
        );
        assert_eq!(
            classify_status(403, b"<html>nope</html>"),
            Some(ApiError::Http { status: 403, message: None })
        );
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = json!({ "success": true, "trips": [] }).to_string();
        let value = decode_envelope(Action::GetTrips, body.as_bytes()).unwrap();
        assert!(value["trips"].is_array());
    }

    #[test]
    fn test_decode_rejection_uses_server_text_or_default() {
        let body = json!({ "success": false, "error": "Wrong password" }).to_string();
        assert_eq!(
            decode_envelope(Action::Login, body.as_bytes()),
            Err(ApiError::Rejected("Wrong password".into()))
        );

        let body = json!({ "success": false }).to_string();
        assert_eq!(
            decode_envelope(Action::Login, body.as_bytes()),
            Err(ApiError::Rejected("Invalid credentials".into()))
        );
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        assert!(matches!(
            decode_envelope(Action::GetTrips, b"<html>"),
            Err(ApiError::Malformed(_))
        ));
        assert!(matches!(
            decode_envelope(Action::GetTrips, b"{\"trips\":[]}"),
            Err(ApiError::Malformed(_))
        ));
    }
}
