//! Form validation applied before anything is sent to the endpoint

use thiserror::Error;

use crate::api::Attachment;
use crate::auth::Registration;
use crate::config::{OdReadingRules, PasswordRules, TripRules, UploadConfig};
use crate::format::format_currency;

const SPECIAL_CHARS: &str = "!@#$%^&*";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in all required fields ({0} is missing)")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min_length} characters and include {requirements}")]
    WeakPassword {
        min_length: usize,
        requirements: String,
    },

    #[error("Trip amount must be between {min} and {max}")]
    TripAmount { min: String, max: String },

    #[error("Trip distance must be between {min}km and {max}km")]
    TripDistance { min: f64, max: f64 },

    #[error("OD reading must be between {min} and {max}")]
    OdReading { min: u64, max: u64 },

    #[error("End OD reading ({end}) cannot be less than start reading ({start})")]
    OdDecreasing { start: u64, end: u64 },

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("File size should not exceed {max_mb}MB")]
    FileTooLarge { max_mb: u64 },

    #[error("Only {allowed} files are allowed")]
    UnsupportedFileType { allowed: String },

    #[error("Custom reports need both a start and an end date")]
    MissingDateRange,

    #[error("Report start date must not be after the end date")]
    InvertedDateRange,
}

/// Reject blank required fields
pub fn require_field(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Check a password against the configured rules
pub fn validate_password(rules: &PasswordRules, password: &str) -> Result<(), ValidationError> {
    let ok = password.chars().count() >= rules.min_length
        && (!rules.require_uppercase || password.chars().any(|c| c.is_ascii_uppercase()))
        && (!rules.require_lowercase || password.chars().any(|c| c.is_ascii_lowercase()))
        && (!rules.require_number || password.chars().any(|c| c.is_ascii_digit()))
        && (!rules.require_special || password.chars().any(|c| SPECIAL_CHARS.contains(c)));

    if ok {
        return Ok(());
    }

    let mut requirements = Vec::new();
    if rules.require_uppercase {
        requirements.push("an uppercase letter".to_string());
    }
    if rules.require_lowercase {
        requirements.push("a lowercase letter".to_string());
    }
    if rules.require_number {
        requirements.push("a number".to_string());
    }
    if rules.require_special {
        requirements.push(format!("one of {}", SPECIAL_CHARS));
    }
    let requirements = if requirements.is_empty() {
        "no other requirements".to_string()
    } else {
        requirements.join(", ")
    };

    Err(ValidationError::WeakPassword {
        min_length: rules.min_length,
        requirements,
    })
}

pub fn validate_registration(
    rules: &PasswordRules,
    registration: &Registration,
) -> Result<(), ValidationError> {
    require_field(&registration.name, "name")?;
    require_field(&registration.username, "username")?;
    require_field(&registration.email, "email")?;
    require_field(&registration.password, "password")?;

    let email = registration.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(ValidationError::InvalidEmail),
    }

    validate_password(rules, &registration.password)
}

pub fn validate_trip(rules: &TripRules, amount: f64, km: f64) -> Result<(), ValidationError> {
    if amount < rules.min_amount || amount > rules.max_amount || amount.is_nan() {
        return Err(ValidationError::TripAmount {
            min: format_currency(rules.min_amount),
            max: format_currency(rules.max_amount),
        });
    }
    if km < rules.min_km || km > rules.max_km || km.is_nan() {
        return Err(ValidationError::TripDistance {
            min: rules.min_km,
            max: rules.max_km,
        });
    }
    Ok(())
}

pub fn validate_od_reading(rules: &OdReadingRules, reading: u64) -> Result<(), ValidationError> {
    if reading < rules.min || reading > rules.max {
        return Err(ValidationError::OdReading {
            min: rules.min,
            max: rules.max,
        });
    }
    Ok(())
}

/// An end-of-day reading must be in range and not below the start reading
pub fn validate_od_end(
    rules: &OdReadingRules,
    start: Option<u64>,
    end: u64,
) -> Result<(), ValidationError> {
    validate_od_reading(rules, end)?;
    match start {
        Some(start) if end < start => Err(ValidationError::OdDecreasing { start, end }),
        _ => Ok(()),
    }
}

pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

pub fn validate_attachment(
    limits: &UploadConfig,
    attachment: &Attachment,
) -> Result<(), ValidationError> {
    if attachment.size() > limits.max_size {
        return Err(ValidationError::FileTooLarge {
            max_mb: limits.max_size / (1024 * 1024),
        });
    }
    if !limits.allowed_types.iter().any(|t| t == &attachment.mime) {
        let allowed = limits
            .allowed_types
            .iter()
            .map(|t| t.trim_start_matches("image/").to_uppercase())
            .collect::<Vec<_>>()
            .join(" and ");
        return Err(ValidationError::UnsupportedFileType { allowed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        let rules = PasswordRules::default();
        assert!(validate_password(&rules, "Str0ng!pw").is_ok());
        assert!(validate_password(&rules, "Sh0rt!").is_err());
        assert!(validate_password(&rules, "nouppercase1!").is_err());
        assert!(validate_password(&rules, "NOLOWERCASE1!").is_err());
        assert!(validate_password(&rules, "NoDigits!!").is_err());
        assert!(validate_password(&rules, "NoSpecial12").is_err());
    }

    #[test]
    fn test_relaxed_password_rules() {
        let rules = PasswordRules {
            min_length: 4,
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        };
        assert!(validate_password(&rules, "abcd").is_ok());
    }

    #[test]
    fn test_trip_bounds() {
        let rules = TripRules::default();
        assert!(validate_trip(&rules, 250.0, 12.0).is_ok());
        let err = validate_trip(&rules, 5.0, 12.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Trip amount must be between ₹10.00 and ₹10,000.00"
        );
        assert_eq!(
            validate_trip(&rules, 250.0, 0.5).unwrap_err().to_string(),
            "Trip distance must be between 1km and 1000km"
        );
    }

    #[test]
    fn test_od_end_cannot_decrease() {
        let rules = OdReadingRules::default();
        assert!(validate_od_end(&rules, Some(1000), 1200).is_ok());
        assert_eq!(
            validate_od_end(&rules, Some(1000), 900),
            Err(ValidationError::OdDecreasing { start: 1000, end: 900 })
        );
        assert!(validate_od_reading(&rules, 1_000_000).is_err());
    }

    #[test]
    fn test_attachment_limits() {
        let limits = UploadConfig::default();
        let ok = Attachment::new("a.png", "image/png", vec![0; 10]);
        assert!(validate_attachment(&limits, &ok).is_ok());

        let big = Attachment::new("a.png", "image/png", vec![0; 6 * 1024 * 1024]);
        assert_eq!(
            validate_attachment(&limits, &big).unwrap_err().to_string(),
            "File size should not exceed 5MB"
        );

        let gif = Attachment::new("a.gif", "image/gif", vec![0; 10]);
        assert_eq!(
            validate_attachment(&limits, &gif).unwrap_err().to_string(),
            "Only JPEG and PNG files are allowed"
        );
    }

    #[test]
    fn test_registration_requires_fields_and_email() {
        let rules = PasswordRules::default();
        let mut reg = Registration {
            name: "Ravi".into(),
            username: "ravi".into(),
            email: "ravi@example.com".into(),
            phone: None,
            password: "Str0ng!pw".into(),
        };
        assert!(validate_registration(&rules, &reg).is_ok());

        reg.email = "not-an-email".into();
        assert_eq!(validate_registration(&rules, &reg), Err(ValidationError::InvalidEmail));

        reg.name = " ".into();
        assert_eq!(
            validate_registration(&rules, &reg),
            Err(ValidationError::MissingField("name"))
        );
    }
}
