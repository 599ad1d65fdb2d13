//! API module for the fleet platform's JSON endpoints

mod client;
mod error;
mod groups;
mod lookups;
mod roles;
mod users;

pub use client::FleetClient;
pub use error::ApiError;
