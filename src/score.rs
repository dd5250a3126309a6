//! Convenience scoring: lower is better.

use std::cmp::Ordering;

use crate::travel_time::TravelTime;

/// Weight on the group's mean travel time.
const MEAN_WEIGHT: f64 = 0.7;

/// Weight on the worst-off participant's travel time.
const MAX_WEIGHT: f64 = 0.3;

/// Scoring outcome for one destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convenience {
    /// `0.7 * mean + 0.3 * max` over the group's travel times, in seconds.
    Scored(f64),
    /// At least one participant cannot reach this destination; it sorts
    /// after every scored destination and is reported, never dropped.
    Disqualified,
}

impl Convenience {
    /// Total ranking order: ascending score, disqualified last.
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Convenience::Scored(a), Convenience::Scored(b)) => a.total_cmp(b),
            (Convenience::Scored(_), Convenience::Disqualified) => Ordering::Less,
            (Convenience::Disqualified, Convenience::Scored(_)) => Ordering::Greater,
            (Convenience::Disqualified, Convenience::Disqualified) => Ordering::Equal,
        }
    }
}

/// Weighted mean/worst-case score over raw durations in seconds.
///
/// # Panics
///
/// Panics on an empty slice. The ranker never produces zero samples for a
/// destination when at least one origin is configured, so an empty slice is
/// a caller bug, not a data condition.
pub fn convenience_score(travel_times: &[u32]) -> f64 {
    assert!(
        !travel_times.is_empty(),
        "convenience_score requires at least one travel time"
    );

    let mut sum = 0.0;
    let mut max = 0.0f64;
    for &secs in travel_times {
        let secs = f64::from(secs);
        sum += secs;
        max = max.max(secs);
    }
    let mean = sum / travel_times.len() as f64;

    mean * MEAN_WEIGHT + max * MAX_WEIGHT
}

/// Score a destination from its per-origin outcomes. Any unreachable sample
/// disqualifies the destination outright.
pub fn score_samples(samples: &[TravelTime]) -> Convenience {
    assert!(
        !samples.is_empty(),
        "score_samples requires at least one travel time"
    );

    let mut durations = Vec::with_capacity(samples.len());
    for sample in samples {
        match sample.seconds() {
            Some(secs) => durations.push(secs),
            None => return Convenience::Disqualified,
        }
    }

    Convenience::Scored(convenience_score(&durations))
}
