//! MBTA v3 JSON:API client.

pub mod client;

pub use client::{ClientConfig, DEFAULT_API_ROOT, MbtaClient};
