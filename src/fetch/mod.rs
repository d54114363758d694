//! HTTP transport for the transit client.
//!
//! [`HttpClient`] is the injectable seam: production code uses
//! [`BasicClient`], tests point it at a mock server.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Longest slice of an unparseable error body kept in the error message.
const MAX_ERROR_BODY: usize = 500;

#[derive(Deserialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: Option<String>,
    detail: Option<String>,
}

/// Issues a GET for `url` and returns the response body.
///
/// Any non-success status becomes [`Error::RemoteQuery`].
pub async fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: Url) -> Result<String> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.text().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "Response received");

    if !status.is_success() {
        return Err(Error::RemoteQuery {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(body)
}

/// Pulls a readable message out of a JSON:API error body.
fn error_message(body: &str) -> String {
    let details: Vec<String> = serde_json::from_str::<ErrorDocument>(body)
        .map(|doc| {
            doc.errors
                .into_iter()
                .filter_map(|e| e.detail.or(e.code))
                .collect()
        })
        .unwrap_or_default();

    if details.is_empty() {
        body.chars().take(MAX_ERROR_BODY).collect()
    } else {
        details.join("; ")
    }
}
