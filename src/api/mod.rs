//! Client side of the action-tagged endpoint protocol

mod action;
mod client;
mod error;
mod request;
mod transport;

pub use action::Action;
pub use client::{classify_status, decode_envelope, ApiClient};
pub use error::{ApiError, ErrorKind};
pub use request::{ApiRequest, Attachment, FormPart, RequestBody};
pub use transport::{HttpTransport, RawResponse, Transport};
