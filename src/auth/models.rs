//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fleet administrator - dashboards, drivers, reports
    Admin,
    /// Driver - trip, expense, OD and complaint logging
    Driver,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Driver => write!(f, "driver"),
        }
    }
}

/// Identity snapshot returned by `login` and `checkAuth`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remaining profile fields, kept verbatim
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            email: None,
            profile: serde_json::Map::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Login credentials
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account details submitted with `register`
#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a session operation. Exactly one variant is produced per call.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// `redirect` is the route the caller should navigate to, if any
    Success { redirect: Option<crate::routes::Route> },
    Failure { error: String },
}

impl AuthOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        AuthOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success { .. } => None,
            AuthOutcome::Failure { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_keeps_profile_fields() {
        let user: User = serde_json::from_value(json!({
            "name": "Ravi",
            "role": "driver",
            "email": "ravi@example.com",
            "vehicle": "KA-01-1234"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Driver);
        assert_eq!(user.email.as_deref(), Some("ravi@example.com"));
        assert_eq!(user.profile["vehicle"], "KA-01-1234");
        assert!(!user.is_admin());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<User, _> =
            serde_json::from_value(json!({ "name": "x", "role": "superuser" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("asha", "S3cret!pw");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("asha"));
        assert!(!printed.contains("S3cret"));
    }
}
