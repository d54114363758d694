use tracing::{debug, info};

use crate::error::Result;
use crate::filter::Constraints;
use crate::services::transit_api::{Prediction, TransitService};

/// Fetches the soonest predicted departure from `stop_id` in direction `direction_id`.
///
/// `Ok(None)` means the service has no prediction, e.g. outside service
/// hours.
#[tracing::instrument(skip(service))]
pub async fn next_departure<S>(
    service: &S,
    stop_id: &str,
    direction_id: &str,
) -> Result<Option<Prediction>>
where
    S: TransitService + ?Sized,
{
    let constraints = Constraints::new()
        .with("stop", stop_id)
        .with("direction_id", direction_id);

    let predictions = service.list_predictions(&constraints, Some(1)).await?;
    debug!(count = predictions.len(), "Predictions fetched");

    let next = predictions.into_iter().next();
    if next.is_none() {
        info!("No prediction available");
    }
    Ok(next)
}
