//! Route categories and the category-filtered route query.

use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::Constraints;
use crate::services::transit_api::{Route, TransitService};

/// Human-facing transit mode names and their numeric route type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCategory {
    LightRail,
    HeavyRail,
    CommuterRail,
    Bus,
    Ferry,
}

impl RouteCategory {
    pub const ALL: [RouteCategory; 5] = [
        RouteCategory::LightRail,
        RouteCategory::HeavyRail,
        RouteCategory::CommuterRail,
        RouteCategory::Bus,
        RouteCategory::Ferry,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RouteCategory::LightRail => "LightRail",
            RouteCategory::HeavyRail => "HeavyRail",
            RouteCategory::CommuterRail => "CommuterRail",
            RouteCategory::Bus => "Bus",
            RouteCategory::Ferry => "Ferry",
        }
    }

    /// The service's route type code.
    pub fn code(self) -> u8 {
        match self {
            RouteCategory::LightRail => 0,
            RouteCategory::HeavyRail => 1,
            RouteCategory::CommuterRail => 2,
            RouteCategory::Bus => 3,
            RouteCategory::Ferry => 4,
        }
    }
}

impl FromStr for RouteCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RouteCategory::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::UnknownRouteCategory(s.to_string()))
    }
}

/// Which route categories to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTypeSelection {
    /// No type filter.
    All,
    /// Category names, checked against [`RouteCategory`] when queried.
    Categories(Vec<String>),
}

impl Default for RouteTypeSelection {
    /// Light and heavy rail: the lines a rider picks a train on.
    fn default() -> Self {
        RouteTypeSelection::Categories(vec![
            RouteCategory::LightRail.name().to_string(),
            RouteCategory::HeavyRail.name().to_string(),
        ])
    }
}

impl RouteTypeSelection {
    /// Builds a selection from command-line words; a lone `all` means no filter.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        match names.as_slice() {
            [only] if only == "all" => RouteTypeSelection::All,
            _ => RouteTypeSelection::Categories(names),
        }
    }
}

impl TryFrom<Value> for RouteTypeSelection {
    type Error = Error;

    /// Accepts `"all"`, a single category name, or an array of names.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) if s == "all" => Ok(RouteTypeSelection::All),
            Value::String(s) => Ok(RouteTypeSelection::Categories(vec![s])),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(Error::InvalidArgument(other.to_string())),
                })
                .collect::<Result<Vec<_>>>()
                .map(RouteTypeSelection::Categories),
            other => Err(Error::InvalidArgument(other.to_string())),
        }
    }
}

/// Lists the routes belonging to the selected categories.
///
/// # Errors
///
/// [`Error::UnknownRouteCategory`] for a name outside the fixed lookup, or any
/// error from the underlying route query.
#[tracing::instrument(skip(service))]
pub async fn filter_route_types<S>(service: &S, selection: &RouteTypeSelection) -> Result<Vec<Route>>
where
    S: TransitService + ?Sized,
{
    let constraints = match selection {
        RouteTypeSelection::All => Constraints::new(),
        RouteTypeSelection::Categories(names) => {
            let codes = names
                .iter()
                .map(|name| name.parse::<RouteCategory>().map(|c| c.code().to_string()))
                .collect::<Result<Vec<_>>>()?;
            Constraints::new().with("type", codes)
        }
    };

    let routes = service.list_routes(&constraints).await?;
    debug!(count = routes.len(), "Routes resolved");
    Ok(routes)
}
