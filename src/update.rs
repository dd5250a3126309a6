//! Batch cache pre-population over the full origins × destinations
//! cross-product, so later ranking runs never call the provider.

use tracing::{debug, info, warn};

use crate::cache::{CacheError, RouteCache};
use crate::config::PlannerConfig;
use crate::coord;
use crate::provider::{FetchOutcome, TravelTimeProvider};

/// Counts for one updater pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Pairs fetched from the provider and written to the cache.
    pub fetched: usize,
    /// Pairs already present in the cache.
    pub skipped: usize,
    /// Transient provider failures. Not cached; a later run retries them.
    pub failed: usize,
}

/// Fill the cache for every (origin, destination) pair that is missing.
///
/// The cache is flushed after each origin's row of destinations, so an
/// interrupted run keeps everything fetched up to that point. Running the
/// updater again over a fully populated cache performs zero provider calls.
pub fn update_all<C, P>(
    config: &PlannerConfig,
    cache: &mut C,
    provider: &P,
) -> Result<UpdateSummary, CacheError>
where
    C: RouteCache + ?Sized,
    P: TravelTimeProvider + ?Sized,
{
    let mut summary = UpdateSummary::default();

    for origin_loc in &config.origins {
        let origin = coord::normalize(origin_loc.lat, origin_loc.lon);
        let origin_key = coord::key_fragment(origin.0, origin.1);
        let mut wrote = false;

        for destination_loc in &config.destinations {
            let destination = coord::normalize(destination_loc.lat, destination_loc.lon);
            let destination_key = coord::key_fragment(destination.0, destination.1);

            if cache.get(&origin_key, &destination_key)?.is_some() {
                summary.skipped += 1;
                continue;
            }

            let outcome = provider.fetch(origin, destination);
            match outcome {
                FetchOutcome::Duration(secs) => {
                    debug!(
                        origin = %origin_loc.name,
                        destination = %destination_loc.name,
                        secs,
                        "cached route"
                    );
                }
                FetchOutcome::NoRoute => {
                    info!(
                        origin = %origin_loc.name,
                        destination = %destination_loc.name,
                        "no transit route, caching as unreachable"
                    );
                }
                FetchOutcome::Failed => {
                    warn!(
                        origin = %origin_loc.name,
                        destination = %destination_loc.name,
                        "provider call failed, will retry on the next run"
                    );
                    summary.failed += 1;
                    continue;
                }
            }

            if let Some(cacheable) = outcome.cacheable() {
                cache.put(&origin_key, &destination_key, cacheable)?;
                summary.fetched += 1;
                wrote = true;
            }
        }

        if wrote {
            cache.flush()?;
        }
    }

    cache.flush()?;
    info!(
        fetched = summary.fetched,
        skipped = summary.skipped,
        failed = summary.failed,
        "route update pass complete"
    );
    Ok(summary)
}
