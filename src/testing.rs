//! In-memory transit service for unit tests.

use std::sync::Mutex;

use chrono::DateTime;

use crate::error::{Error, Result};
use crate::filter::Constraints;
use crate::services::transit_api::{Prediction, Route, Stop, TransitService};

const RED_LINE_STOPS: [(&str, &str); 22] = [
    ("place-alfcl", "Alewife"),
    ("place-davis", "Davis"),
    ("place-portr", "Porter"),
    ("place-harsq", "Harvard"),
    ("place-cntsq", "Central"),
    ("place-knncl", "Kendall/MIT"),
    ("place-chmnl", "Charles/MGH"),
    ("place-pktrm", "Park Street"),
    ("place-dwnxg", "Downtown Crossing"),
    ("place-sstat", "South Station"),
    ("place-brdwy", "Broadway"),
    ("place-andrw", "Andrew"),
    ("place-jfk", "JFK/UMass"),
    ("place-shmnl", "Savin Hill"),
    ("place-fldcr", "Fields Corner"),
    ("place-smmnl", "Shawmut"),
    ("place-asmnl", "Ashmont"),
    ("place-nqncy", "North Quincy"),
    ("place-wlsta", "Wollaston"),
    ("place-qnctr", "Quincy Center"),
    ("place-qamnl", "Quincy Adams"),
    ("place-brntn", "Braintree"),
];

/// Ashmont branch only, so both ends are stops on the line.
const ASHMONT_STOPS: [(&str, &str); 3] = [
    ("place-alfcl", "Alewife"),
    ("place-harsq", "Harvard"),
    ("place-asmnl", "Ashmont"),
];

fn route(id: &str, name: &str, route_type: u8, names: [&str; 2], dests: [&str; 2]) -> Route {
    Route {
        id: id.to_string(),
        long_name: name.to_string(),
        route_type,
        direction_names: names.map(str::to_string),
        direction_destinations: dests.map(str::to_string),
    }
}

fn catalog() -> Vec<Route> {
    vec![
        route("Red", "Red Line", 1, ["South", "North"], ["Ashmont/Braintree", "Alewife"]),
        route("Red-Ashmont", "Red Line Ashmont", 1, ["South", "North"], ["Ashmont", "Alewife"]),
        route("Mattapan", "Mattapan Trolley", 0, ["Outbound", "Inbound"], ["Mattapan", "Ashmont"]),
        route("Green-B", "Green Line B", 0, ["West", "East"], ["Boston College", "Government Center"]),
        route("Orange", "Orange Line", 1, ["South", "North"], ["Forest Hills", "Oak Grove"]),
        route("CR-Fitchburg", "Fitchburg Line", 2, ["Outbound", "Inbound"], ["Wachusett", "North Station"]),
        route("1", "Harvard Square - Nubian Station", 3, ["Outbound", "Inbound"], ["Harvard Square", "Nubian Station"]),
        route("Boat-F1", "Hingham/Hull Ferry", 4, ["Outbound", "Inbound"], ["Hingham or Hull", "Long Wharf or Rowes Wharf"]),
    ]
}

fn prediction(time: &str, direction_id: u8) -> Prediction {
    Prediction {
        departure_time: Some(DateTime::parse_from_rfc3339(time).unwrap()),
        direction_id,
    }
}

fn stops(table: &[(&str, &str)]) -> Vec<Stop> {
    table
        .iter()
        .map(|(id, name)| Stop {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PredictionMode {
    Running,
    NotRunning,
    ArrivalsOnly,
    Failing,
}

/// A fixed MBTA-like catalog that records the prediction queries it serves.
pub struct FakeTransit {
    mode: PredictionMode,
    prediction_queries: Mutex<Vec<(Constraints, Option<u32>)>>,
}

impl FakeTransit {
    pub fn new() -> Self {
        Self {
            mode: PredictionMode::Running,
            prediction_queries: Mutex::new(Vec::new()),
        }
    }

    /// Service is outside operating hours: prediction queries return nothing.
    pub fn without_predictions(mut self) -> Self {
        self.mode = PredictionMode::NotRunning;
        self
    }

    /// Every prediction is a terminating arrival with no departure time.
    pub fn arrivals_only(mut self) -> Self {
        self.mode = PredictionMode::ArrivalsOnly;
        self
    }

    /// Prediction queries are rejected by the service.
    pub fn failing_predictions(mut self) -> Self {
        self.mode = PredictionMode::Failing;
        self
    }

    pub fn last_prediction_constraints(&self) -> Option<Constraints> {
        let queries = self.prediction_queries.lock().unwrap();
        queries.last().map(|(c, _)| c.clone())
    }

    pub fn last_prediction_limit(&self) -> Option<Option<u32>> {
        let queries = self.prediction_queries.lock().unwrap();
        queries.last().map(|(_, limit)| *limit)
    }
}

fn filter_words(constraints: &Constraints, name: &str) -> Option<Vec<String>> {
    constraints
        .get(name)
        .map(|v| v.encode().split(',').map(str::to_string).collect())
}

#[async_trait::async_trait]
impl TransitService for FakeTransit {
    async fn list_routes(&self, constraints: &Constraints) -> Result<Vec<Route>> {
        let routes = catalog();
        Ok(match filter_words(constraints, "type") {
            Some(codes) => routes
                .into_iter()
                .filter(|r| codes.contains(&r.route_type.to_string()))
                .collect(),
            None => routes,
        })
    }

    async fn list_stops(&self, constraints: &Constraints) -> Result<Vec<Stop>> {
        let routes = filter_words(constraints, "route").unwrap_or_default();
        let mut found = Vec::new();
        for route in routes {
            match route.as_str() {
                "Red" => found.extend(stops(&RED_LINE_STOPS)),
                "Red-Ashmont" => found.extend(stops(&ASHMONT_STOPS)),
                _ => {}
            }
        }
        Ok(found)
    }

    async fn list_predictions(
        &self,
        constraints: &Constraints,
        limit: Option<u32>,
    ) -> Result<Vec<Prediction>> {
        self.prediction_queries
            .lock()
            .unwrap()
            .push((constraints.clone(), limit));

        if self.mode == PredictionMode::Failing || constraints.is_empty() {
            return Err(Error::RemoteQuery {
                status: 400,
                message: "At least one filter[stop], filter[trip], filter[route] is required."
                    .to_string(),
            });
        }
        if self.mode == PredictionMode::NotRunning {
            return Ok(Vec::new());
        }

        let direction = filter_words(constraints, "direction_id").unwrap_or_default();
        let mut predictions = Vec::new();
        if direction.iter().any(|d| d == "South") {
            predictions.push(prediction("2024-03-05T17:45:30-05:00", 0));
            predictions.push(prediction("2024-03-05T17:53:00-05:00", 0));
        }
        if direction.iter().any(|d| d == "North") {
            predictions.push(prediction("2024-03-05T17:42:09-05:00", 1));
            predictions.push(prediction("2024-03-05T17:50:00-05:00", 1));
        }
        if self.mode == PredictionMode::ArrivalsOnly {
            for p in &mut predictions {
                p.departure_time = None;
            }
        }
        if let Some(limit) = limit {
            predictions.truncate(limit as usize);
        }
        Ok(predictions)
    }
}
