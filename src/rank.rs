//! Destination ranking: gather travel times (cache first, provider on miss),
//! score each destination, return the full list sorted ascending.

use crate::cache::{CacheError, RouteCache};
use crate::config::PlannerConfig;
use crate::coord;
use crate::provider::TravelTimeProvider;
use crate::score::{self, Convenience};
use crate::travel_time::TravelTime;

/// One destination with its score. Ephemeral, produced per ranking run.
#[derive(Debug, Clone)]
pub struct RankedDestination {
    pub location: crate::config::Location,
    pub score: Convenience,
    /// Per-origin travel times, in config origin order. Kept for reporting.
    pub travel_times: Vec<TravelTime>,
}

/// Rank every configured destination, best first.
///
/// The sort is stable: destinations with equal scores keep their config
/// order. Disqualified destinations sort last but are never dropped;
/// filtering is a presentation concern.
pub fn rank_destinations<C, P>(
    config: &PlannerConfig,
    cache: &mut C,
    provider: &P,
) -> Result<Vec<RankedDestination>, CacheError>
where
    C: RouteCache + ?Sized,
    P: TravelTimeProvider + ?Sized,
{
    let origins: Vec<(f64, f64)> = config
        .origins
        .iter()
        .map(|loc| coord::normalize(loc.lat, loc.lon))
        .collect();
    let origin_keys: Vec<String> = origins
        .iter()
        .map(|(lat, lon)| coord::key_fragment(*lat, *lon))
        .collect();

    let mut ranked = Vec::with_capacity(config.destinations.len());

    for destination_loc in &config.destinations {
        let destination = coord::normalize(destination_loc.lat, destination_loc.lon);
        let destination_key = coord::key_fragment(destination.0, destination.1);

        let mut travel_times = Vec::with_capacity(origins.len());
        let mut wrote = false;

        for (origin, origin_key) in origins.iter().zip(&origin_keys) {
            let time = match cache.get(origin_key, &destination_key)? {
                Some(time) => time,
                None => {
                    let outcome = provider.fetch(*origin, destination);
                    if let Some(cacheable) = outcome.cacheable() {
                        cache.put(origin_key, &destination_key, cacheable)?;
                        wrote = true;
                    }
                    outcome.travel_time()
                }
            };
            travel_times.push(time);
        }

        // Write-through: persist this destination's batch before moving on.
        if wrote {
            cache.flush()?;
        }

        ranked.push(RankedDestination {
            location: destination_loc.clone(),
            score: score::score_samples(&travel_times),
            travel_times,
        });
    }

    ranked.sort_by(|a, b| a.score.cmp_rank(&b.score));
    Ok(ranked)
}
