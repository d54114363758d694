//! Trait and types for querying a real-time transit catalog.

use chrono::{DateTime, FixedOffset};

use crate::error::Result;
use crate::filter::Constraints;

/// A transit line from the catalog.
///
/// `direction_names[i]` and `direction_destinations[i]` describe the same
/// direction of travel, e.g. `"South"` heading to `"Ashmont/Braintree"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: String,
    pub long_name: String,
    /// Numeric route type code: LightRail=0, HeavyRail=1, CommuterRail=2, Bus=3, Ferry=4.
    pub route_type: u8,
    pub direction_names: [String; 2],
    pub direction_destinations: [String; 2],
}

impl Route {
    /// Position of `destination` within this route's destinations.
    pub fn destination_index(&self, destination: &str) -> Option<usize> {
        self.direction_destinations
            .iter()
            .position(|d| d == destination)
    }
}

/// A stop served by the route it was queried for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: String,
    pub name: String,
}

/// A predicted departure at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// `None` when the vehicle terminates at the stop.
    pub departure_time: Option<DateTime<FixedOffset>>,
    /// 0 or 1, indexing the route's two directions.
    pub direction_id: u8,
}

impl Prediction {
    /// Wall-clock part (`HH:MM:SS`) of the departure time, in the offset the
    /// service reported it in.
    pub fn departure_clock(&self) -> Option<String> {
        self.departure_time
            .map(|t| t.format("%H:%M:%S").to_string())
    }
}

/// Abstraction over the remote transit data service.
///
/// Every operation returns entities in the order the service sent them.
#[async_trait::async_trait]
pub trait TransitService: Send + Sync {
    async fn list_routes(&self, constraints: &Constraints) -> Result<Vec<Route>>;

    async fn list_stops(&self, constraints: &Constraints) -> Result<Vec<Stop>>;

    /// With `limit = Some(n)` at most `n` predictions are returned.
    async fn list_predictions(
        &self,
        constraints: &Constraints,
        limit: Option<u32>,
    ) -> Result<Vec<Prediction>>;
}
