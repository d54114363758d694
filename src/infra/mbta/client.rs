use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fetch::{BasicClient, HttpClient, fetch_text};
use crate::filter::{Constraints, filter_params};
use crate::services::transit_api::{Prediction, Route, Stop, TransitService};

/// Production MBTA v3 API.
pub const DEFAULT_API_ROOT: &str = "https://api-v3.mbta.com";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`MbtaClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the resource paths are appended to
    pub api_root: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom API root (for testing).
    pub fn with_api_root(mut self, url: impl Into<String>) -> Self {
        self.api_root = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Deserialize)]
struct Document<A> {
    data: Vec<Resource<A>>,
}

#[derive(Deserialize)]
struct Resource<A> {
    id: String,
    attributes: A,
}

#[derive(Deserialize)]
struct RouteAttributes {
    long_name: String,
    #[serde(rename = "type")]
    route_type: u8,
    direction_names: [String; 2],
    direction_destinations: [String; 2],
}

#[derive(Deserialize)]
struct StopAttributes {
    name: String,
}

#[derive(Deserialize)]
struct PredictionAttributes {
    departure_time: Option<DateTime<FixedOffset>>,
    direction_id: u8,
}

/// Typed client for the routes, stops and predictions endpoints.
pub struct MbtaClient<C> {
    http: C,
    api_root: Url,
}

impl MbtaClient<BasicClient> {
    /// Creates a client using the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = BasicClient::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_http(http, &config.api_root)
    }
}

impl<C: HttpClient> MbtaClient<C> {
    /// Creates a client on top of any [`HttpClient`].
    pub fn with_http(http: C, api_root: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidApiRoot {
            url: api_root.to_string(),
            message,
        };

        let url = Url::parse(api_root).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }

        Ok(Self {
            http,
            api_root: url,
        })
    }

    fn resource_url(&self, path: &str, constraints: &Constraints, limit: Option<u32>) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }

        let params = filter_params(constraints);
        if !params.is_empty() || limit.is_some() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &params {
                query.append_pair(key, value);
            }
            if let Some(limit) = limit {
                query.append_pair("page[limit]", &limit.to_string());
            }
        }

        url
    }

    #[tracing::instrument(skip(self, constraints), fields(filters = ?constraints))]
    async fn query<A: DeserializeOwned>(
        &self,
        path: &str,
        constraints: &Constraints,
        limit: Option<u32>,
    ) -> Result<Vec<Resource<A>>> {
        let url = self.resource_url(path, constraints, limit);
        debug!(url = %url, "Querying transit service");

        let body = fetch_text(&self.http, url).await?;
        let document: Document<A> = serde_json::from_str(&body).map_err(|e| Error::Decode {
            message: e.to_string(),
        })?;

        debug!(count = document.data.len(), "Resources decoded");
        Ok(document.data)
    }
}

#[async_trait]
impl<C: HttpClient> TransitService for MbtaClient<C> {
    async fn list_routes(&self, constraints: &Constraints) -> Result<Vec<Route>> {
        let resources = self
            .query::<RouteAttributes>("routes", constraints, None)
            .await?;

        Ok(resources
            .into_iter()
            .map(|r| Route {
                id: r.id,
                long_name: r.attributes.long_name,
                route_type: r.attributes.route_type,
                direction_names: r.attributes.direction_names,
                direction_destinations: r.attributes.direction_destinations,
            })
            .collect())
    }

    async fn list_stops(&self, constraints: &Constraints) -> Result<Vec<Stop>> {
        let resources = self
            .query::<StopAttributes>("stops", constraints, None)
            .await?;

        Ok(resources
            .into_iter()
            .map(|r| Stop {
                id: r.id,
                name: r.attributes.name,
            })
            .collect())
    }

    async fn list_predictions(
        &self,
        constraints: &Constraints,
        limit: Option<u32>,
    ) -> Result<Vec<Prediction>> {
        let resources = self
            .query::<PredictionAttributes>("predictions", constraints, limit)
            .await?;

        let mut predictions: Vec<Prediction> = resources
            .into_iter()
            .map(|r| Prediction {
                departure_time: r.attributes.departure_time,
                direction_id: r.attributes.direction_id,
            })
            .collect();

        if let Some(limit) = limit {
            predictions.truncate(limit as usize);
        }

        Ok(predictions)
    }
}
