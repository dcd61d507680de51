//! Fleetdesk - driver and fleet management client
//!
//! This is the library interface for Fleetdesk: the session manager, the
//! route guard and typed access to the fleet endpoint.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod format;
pub mod routes;
pub mod validation;

pub use auth::{AuthOutcome, Session, SessionManager};
pub use config::Config;
pub use error::Error;
pub use fleet::FleetClient;
pub use routes::{Decision, Route};
