//! Fleet records: trips, expenses, complaints, payments, OD logs and reports

mod client;
mod models;

pub use client::FleetClient;
pub use models::*;
