//! Next-train lookup against the MBTA real-time API.
//!
//! The rider picks a line, a stop and a direction; the soonest predicted
//! departure for that stop and direction is then reported.

pub mod departure;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod infra;
pub mod predict;
pub mod route_types;
pub mod selection;
pub mod services;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
