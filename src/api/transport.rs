//! Transports carry an [`ApiRequest`] to the endpoint and return the raw reply

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use super::{ApiError, ApiRequest, FormPart};
use crate::error::Result;

/// Raw HTTP reply before envelope decoding
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }
}

/// Sends requests to the endpoint. Implementations only report
/// transport-level failures ([`ApiError::Timeout`], [`ApiError::Connect`]);
/// HTTP status handling is done by the client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ApiError>;
}

/// reqwest-backed transport posting to a single URL
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fleetdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_form(request: &ApiRequest) -> std::result::Result<Form, ApiError> {
        let mut form = Form::new();
        for part in request.form_parts() {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File { name, attachment } => {
                    let file = Part::bytes(attachment.bytes)
                        .file_name(attachment.file_name)
                        .mime_str(&attachment.mime)
                        .map_err(|e| {
                            ApiError::Malformed(format!("invalid attachment type: {}", e))
                        })?;
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Connect(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ApiError> {
        let mut builder = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .header("X-Request-Id", request.id.to_string());

        if let Some(token) = &request.session_token {
            builder = builder.bearer_auth(token);
        }

        builder = if request.is_multipart() {
            builder.multipart(Self::build_form(request)?)
        } else {
            builder.json(&request.to_json())
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
