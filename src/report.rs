//! Text rendering of ranking results: a minute-granularity histogram of the
//! group's travel times and the top-N destination listing.

use crate::rank::RankedDestination;
use crate::score::Convenience;
use crate::travel_time::TravelTime;

const BUCKET_COUNT: u32 = 10;
const MAX_BAR_WIDTH: usize = 40;

/// Render one destination's per-origin travel times as a histogram with
/// proportional bar rows, bucketed by minutes.
pub fn travel_time_histogram(travel_times: &[TravelTime]) -> String {
    let minutes: Vec<u32> = travel_times
        .iter()
        .filter_map(|time| time.seconds())
        .map(|secs| secs / 60)
        .collect();
    let unreachable = travel_times.len() - minutes.len();

    let mut out = String::new();

    if minutes.is_empty() {
        out.push_str("   (no reachable routes)\n");
    } else {
        let lo = minutes.iter().fold(u32::MAX, |acc, &m| acc.min(m));
        let hi = minutes.iter().fold(0, |acc, &m| acc.max(m));
        let bucket_width = ((hi - lo) / BUCKET_COUNT + 1).max(1);

        let mut counts = vec![0usize; BUCKET_COUNT as usize];
        for &minute in &minutes {
            let bucket = ((minute - lo) / bucket_width).min(BUCKET_COUNT - 1);
            counts[bucket as usize] += 1;
        }
        let peak = counts.iter().fold(1, |acc, &c| acc.max(c));

        for (bucket, &count) in counts.iter().enumerate() {
            let bucket_lo = lo + bucket as u32 * bucket_width;
            let bucket_hi = bucket_lo + bucket_width - 1;
            if bucket_lo > hi {
                break;
            }
            let bar_len = if count == 0 {
                0
            } else {
                (count * MAX_BAR_WIDTH / peak).max(1)
            };
            out.push_str(&format!(
                "   {:>3}-{:>3} min |{} {}\n",
                bucket_lo,
                bucket_hi,
                "█".repeat(bar_len),
                count
            ));
        }
    }

    if unreachable > 0 {
        out.push_str(&format!("   unreachable: {}\n", unreachable));
    }

    out
}

/// Numbered top-N listing, one destination per entry with its score and
/// travel-time histogram.
pub fn format_top_destinations(ranked: &[RankedDestination], top: usize) -> String {
    let mut out = format!("Top {} best destinations:\n", top.min(ranked.len()));

    for (index, destination) in ranked.iter().take(top).enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, destination.location.name));
        match destination.score {
            Convenience::Scored(score) => {
                out.push_str(&format!("   Convenience score: {}\n", score.round() as i64));
            }
            Convenience::Disqualified => {
                out.push_str("   Convenience score: unreachable\n");
            }
        }
        out.push_str(&travel_time_histogram(&destination.travel_times));
        out.push('\n');
    }

    out
}
