//! Action-tagged request bodies

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

use super::Action;
use crate::error::{Error, Result};

/// A file part of a multipart form
#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing the content type from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Other(format!("Invalid file name: {}", path.display())))?
            .to_string();
        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        };
        Ok(Self::new(file_name, mime, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, attachment: Attachment },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Map<String, Value>),
    Multipart(Vec<FormPart>),
}

/// One POST to the endpoint
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub id: Uuid,
    pub action: Action,
    pub session_token: Option<String>,
    include_token: bool,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(action: Action) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            session_token: None,
            include_token: false,
            body: RequestBody::Json(Map::new()),
        }
    }

    /// Attach the session token; it is sent as `sessionToken` even when absent
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.session_token = token;
        self.include_token = true;
        self
    }

    /// Add a scalar field
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match &mut self.body {
            RequestBody::Json(map) => {
                map.insert(name.to_string(), value);
            }
            RequestBody::Multipart(parts) => {
                if !value.is_null() {
                    parts.push(FormPart::Text {
                        name: name.to_string(),
                        value: text_value(&value),
                    });
                }
            }
        }
        self
    }

    /// Merge every field of a serializable struct into the body
    pub fn fields<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        match serde_json::to_value(payload)? {
            Value::Object(map) => {
                for (name, value) in map {
                    self = self.field(&name, value);
                }
                Ok(self)
            }
            other => Err(Error::Other(format!(
                "Request payload must be an object, got {}",
                other
            ))),
        }
    }

    /// Add a file; switches the body to multipart, keeping earlier fields as text parts
    pub fn file(mut self, name: &str, attachment: Attachment) -> Self {
        if let RequestBody::Json(map) = &self.body {
            let parts = map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| FormPart::Text {
                    name: k.clone(),
                    value: text_value(v),
                })
                .collect();
            self.body = RequestBody::Multipart(parts);
        }
        if let RequestBody::Multipart(parts) = &mut self.body {
            parts.push(FormPart::File {
                name: name.to_string(),
                attachment,
            });
        }
        self
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }

    /// The JSON document posted for non-multipart requests
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("action".to_string(), Value::from(self.action.as_str()));
        if let RequestBody::Json(fields) = &self.body {
            for (k, v) in fields {
                map.insert(k.clone(), v.clone());
            }
        }
        if self.include_token {
            map.insert(
                "sessionToken".to_string(),
                self.session_token.clone().map(Value::from).unwrap_or(Value::Null),
            );
        }
        Value::Object(map)
    }

    /// Text parts for multipart requests, with `action` and `sessionToken` first
    pub fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![FormPart::Text {
            name: "action".to_string(),
            value: self.action.as_str().to_string(),
        }];
        if let Some(token) = self.session_token.as_ref().filter(|_| self.include_token) {
            parts.push(FormPart::Text {
                name: "sessionToken".to_string(),
                value: token.clone(),
            });
        }
        if let RequestBody::Multipart(body) = &self.body {
            parts.extend(body.iter().cloned());
        }
        parts
    }

    /// Look up a field value (JSON body) or text part (multipart body)
    pub fn get(&self, name: &str) -> Option<Value> {
        match &self.body {
            RequestBody::Json(map) => map.get(name).cloned(),
            RequestBody::Multipart(parts) => parts.iter().find_map(|p| match p {
                FormPart::Text { name: n, value } if n == name => Some(Value::from(value.clone())),
                _ => None,
            }),
        }
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_carries_action_and_null_token() {
        let req = ApiRequest::new(Action::CheckAuth).with_token(None);
        let json = req.to_json();
        assert_eq!(json["action"], "checkAuth");
        assert!(json.get("sessionToken").is_some());
        assert!(json["sessionToken"].is_null());
    }

    #[test]
    fn test_login_body_has_no_token_field() {
        let req = ApiRequest::new(Action::Login)
            .field("username", "asha")
            .field("password", "x");
        let json = req.to_json();
        assert_eq!(json["username"], "asha");
        assert!(json.get("sessionToken").is_none());
    }

    #[test]
    fn test_file_switches_to_multipart() {
        let req = ApiRequest::new(Action::AddCngExpense)
            .with_token(Some("tok".into()))
            .field("amount", 450)
            .field("paidBy", "cash")
            .file("receipt", Attachment::new("r.png", "image/png", vec![1, 2, 3]));
        assert!(req.is_multipart());

        let parts = req.form_parts();
        assert_eq!(
            parts[0],
            FormPart::Text { name: "action".into(), value: "addCNGExpense".into() }
        );
        assert_eq!(
            parts[1],
            FormPart::Text { name: "sessionToken".into(), value: "tok".into() }
        );
        assert!(parts.contains(&FormPart::Text { name: "amount".into(), value: "450".into() }));
        assert!(matches!(parts.last(), Some(FormPart::File { name, .. }) if name == "receipt"));
        assert_eq!(req.get("paidBy"), Some(Value::from("cash")));
    }

    #[test]
    fn test_attachment_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odometer.JPG");
        std::fs::write(&path, b"jpeg").unwrap();
        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.mime, "image/jpeg");
        assert_eq!(attachment.file_name, "odometer.JPG");
        assert_eq!(attachment.size(), 4);
    }
}
