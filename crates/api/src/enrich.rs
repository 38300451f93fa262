//! Best-effort result enrichment.
//!
//! One observation lookup per normalized result, all launched together
//! and merged back by original index. A failed or empty lookup leaves
//! its result untouched; this stage never fails the response.

use std::sync::Arc;

use canopy_core::limits::ENRICHMENT_SOURCE;
use canopy_core::{IdentifyResult, ResultImage};
use providers::ObservationProvider;
use telemetry::metrics;
use tokio::task::JoinSet;
use tracing::debug;

/// Attach a representative observation photo to each result that has
/// one available.
pub async fn attach_photos(
    observations: &Arc<dyn ObservationProvider>,
    results: &mut [IdentifyResult],
) {
    let mut lookups = JoinSet::new();

    for (index, result) in results.iter().enumerate() {
        let provider = observations.clone();
        let species = result.species.clone();
        metrics().enrichment_lookups.inc();
        lookups.spawn(async move { (index, provider.latest_photo(&species).await) });
    }

    // Completion order is arbitrary; the index pairs each outcome back
    // to its result. Panicked or errored lookups are simply skipped.
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((index, Ok(Some(url)))) => {
                results[index].image = Some(ResultImage {
                    url,
                    source: Some(ENRICHMENT_SOURCE.to_string()),
                });
            }
            Ok((index, Ok(None))) => {
                debug!(index, "No observation photo available");
            }
            Ok((index, Err(e))) => {
                debug!(index, error = %e, "Observation lookup failed");
                metrics().enrichment_failures.inc();
            }
            Err(_) => {
                metrics().enrichment_failures.inc();
            }
        }
    }
}
