//! Shared row types for the KNBS open data workspace.
//!
//! Everything here is plain data: the `database` crate decodes these from
//! PostgreSQL and the `web-server` crate serializes them into responses.

pub mod error;
pub mod params;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use params::{parse_county_id, parse_year, MAX_YEAR, MIN_YEAR};
pub use structs::{County, Indicator, Observation};
