//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::RetryPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// The single script endpoint every action is posted to
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of retries after the first attempt
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base delay between register retries, doubled per attempt
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Ceiling for the backoff delay
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080/exec".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_max_retry_delay_ms() -> u64 {
    5_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Retry policy shared by login and register
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry_count,
            base_delay: Duration::from_millis(self.retry_delay_ms),
            max_delay: Duration::from_millis(self.max_retry_delay_ms),
        }
    }
}

/// Session token storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the session token between runs
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_token_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".fleetdesk").join("sessionToken")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

/// Limits for attached images (receipts, proofs, odometer photos)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

fn default_max_size() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    vec!["image/jpeg".to_string(), "image/png".to_string()]
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

/// Form validation rules
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub password: PasswordRules,

    #[serde(default)]
    pub od_reading: OdReadingRules,

    #[serde(default)]
    pub trip: TripRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordRules {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_true")]
    pub require_uppercase: bool,

    #[serde(default = "default_true")]
    pub require_lowercase: bool,

    #[serde(default = "default_true")]
    pub require_number: bool,

    /// Requires one of `!@#$%^&*`
    #[serde(default = "default_true")]
    pub require_special: bool,
}

fn default_min_length() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            require_uppercase: true,
            require_lowercase: true,
            require_number: true,
            require_special: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OdReadingRules {
    #[serde(default)]
    pub min: u64,

    #[serde(default = "default_od_max")]
    pub max: u64,
}

fn default_od_max() -> u64 {
    999_999
}

impl Default for OdReadingRules {
    fn default() -> Self {
        Self {
            min: 0,
            max: default_od_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRules {
    #[serde(default = "default_min_amount")]
    pub min_amount: f64,

    #[serde(default = "default_max_amount")]
    pub max_amount: f64,

    #[serde(default = "default_min_km")]
    pub min_km: f64,

    #[serde(default = "default_max_km")]
    pub max_km: f64,
}

fn default_min_amount() -> f64 {
    10.0
}

fn default_max_amount() -> f64 {
    10_000.0
}

fn default_min_km() -> f64 {
    1.0
}

fn default_max_km() -> f64 {
    1_000.0
}

impl Default for TripRules {
    fn default() -> Self {
        Self {
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
            min_km: default_min_km(),
            max_km: default_max_km(),
        }
    }
}
