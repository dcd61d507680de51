//! Authentication and session management

pub mod models;
pub mod retry;
pub mod session;
pub mod token_store;

pub use models::{AuthOutcome, Credentials, Registration, Role, User};
pub use retry::RetryPolicy;
pub use session::{Session, SessionManager, SessionPhase};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
