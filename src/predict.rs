//! Route → stop → direction → prediction resolution.

use std::fmt;
use std::io::{BufRead, Write};

use tracing::info;

use crate::departure::next_departure;
use crate::error::Result;
use crate::filter::Constraints;
use crate::route_types::{RouteTypeSelection, filter_route_types};
use crate::selection::Console;
use crate::services::transit_api::TransitService;

/// Answers supplied up front; `None` means ask on the console.
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub route_types: RouteTypeSelection,
    pub route: Option<String>,
    pub stop: Option<String>,
    pub direction: Option<String>,
}

/// Outcome of one departure lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Departure {
        stop: String,
        direction: String,
        /// `HH:MM:SS`
        time: String,
    },
    /// The service has no upcoming departure, e.g. outside service hours.
    ///
    /// Only the soonest prediction is consulted, so an arrival-only entry
    /// (a trip terminating here) also lands here even if later trips depart.
    NoDeparture { stop: String, direction: String },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Departure {
                stop,
                direction,
                time,
            } => write!(
                f,
                "The next train from {stop} stop going to {direction} is departing at {time}"
            ),
            Report::NoDeparture { stop, direction } => write!(
                f,
                "No available departure times at {stop} stop going to {direction}"
            ),
        }
    }
}

/// Walks the rider through choosing a route, stop and direction, then
/// reports the next departure.
///
/// At either end of the line the direction is not asked for: the rider can
/// only travel toward the other end.
pub async fn predict_departure<S, R, W>(
    service: &S,
    console: &mut Console<R, W>,
    answers: &Answers,
) -> Result<Report>
where
    S: TransitService + ?Sized,
    R: BufRead,
    W: Write,
{
    let routes = filter_route_types(service, &answers.route_types).await?;
    let route = console.select(
        routes,
        |r| r.long_name.as_str(),
        "route",
        answers.route.as_deref(),
    )?;
    info!(route_id = %route.id, "Route chosen");

    let stops = service
        .list_stops(&Constraints::new().with("route", route.id.as_str()))
        .await?;
    let stop = console.select(stops, |s| s.name.as_str(), "stop", answers.stop.as_deref())?;
    info!(stop_id = %stop.id, "Stop chosen");

    let destination_index = match route.destination_index(&stop.name) {
        Some(terminus) => {
            let heading = if terminus == 0 { 1 } else { 0 };
            console.say(&format!(
                "You are at the end of the line at {} stop going to {}\n",
                stop.name, route.direction_destinations[heading]
            ))?;
            info!(stop = %stop.name, "Stop is a terminus, direction forced");
            heading
        }
        None => {
            let options: Vec<(usize, String)> = route
                .direction_destinations
                .iter()
                .cloned()
                .enumerate()
                .collect();
            let (index, _) = console.select(
                options,
                |o| o.1.as_str(),
                "direction",
                answers.direction.as_deref(),
            )?;
            index
        }
    };

    let direction = route.direction_destinations[destination_index].clone();
    let direction_id = &route.direction_names[destination_index];

    let prediction = next_departure(service, &stop.id, direction_id).await?;
    let report = match prediction.and_then(|p| p.departure_clock()) {
        Some(time) => Report::Departure {
            stop: stop.name,
            direction,
            time,
        },
        None => Report::NoDeparture {
            stop: stop.name,
            direction,
        },
    };

    console.say(&report.to_string())?;
    Ok(report)
}
