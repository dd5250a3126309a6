//! Coordinate rounding and cache-key construction.
//!
//! Coordinates are stored at 4 decimal places (~11 m) but cache keys are
//! built from 2-decimal fragments (~1.1 km). Nearby addresses that round to
//! the same 2-decimal value deliberately share one cache entry, so repeated
//! queries for "the same" location hit the cache despite float jitter.

/// Round a coordinate pair to 4 decimal places for storage and provider calls.
pub fn normalize(lat: f64, lon: f64) -> (f64, f64) {
    (round_to(lat, 4), round_to(lon, 4))
}

/// Build the 2-decimal key fragment for one coordinate pair, e.g. `40.71,-74.01`.
pub fn key_fragment(lat: f64, lon: f64) -> String {
    format!("{:.2},{:.2}", lat, lon)
}

/// Build the composite cache key for an origin/destination pair,
/// e.g. `40.71,-74.01->39.95,-75.17`.
pub fn route_key(origin_fragment: &str, destination_fragment: &str) -> String {
    format!("{}->{}", origin_fragment, destination_fragment)
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
