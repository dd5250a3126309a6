//! HTTP adapter for the transit distance-matrix API.

use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use serde::Deserialize;
use tracing::warn;

use crate::travel_time::TravelTime;

/// Outcome of one provider call for one (origin, destination) pair.
///
/// "No route" and "the call failed" are kept apart: a confirmed missing
/// route is cached permanently, a transient failure is retried on a later
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Transit duration in seconds.
    Duration(u32),
    /// The provider responded but found no transit route.
    NoRoute,
    /// Network error, malformed response, quota error or timeout.
    Failed,
}

impl FetchOutcome {
    /// Travel time as the scorer sees it. Failures degrade to unreachable
    /// for the current run.
    pub fn travel_time(self) -> TravelTime {
        match self {
            FetchOutcome::Duration(secs) => TravelTime::Reachable(secs),
            FetchOutcome::NoRoute | FetchOutcome::Failed => TravelTime::Unreachable,
        }
    }

    /// Value to persist, if any. Transient failures are never cached.
    pub fn cacheable(self) -> Option<TravelTime> {
        match self {
            FetchOutcome::Duration(secs) => Some(TravelTime::Reachable(secs)),
            FetchOutcome::NoRoute => Some(TravelTime::Unreachable),
            FetchOutcome::Failed => None,
        }
    }
}

/// Fetches one transit travel time per call.
///
/// Implementations must never panic or return errors for per-pair problems;
/// they degrade to [`FetchOutcome::NoRoute`] / [`FetchOutcome::Failed`] so
/// the ranking pipeline keeps going.
pub trait TravelTimeProvider {
    fn fetch(&self, origin: (f64, f64), destination: (f64, f64)) -> FetchOutcome;
}

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub base_url: String,
    /// API key, passed in explicitly at construction. The library never
    /// reads it from the process environment.
    pub api_key: String,
    pub timeout_secs: u64,
}

impl MatrixConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

/// Blocking client for the distance-matrix endpoint, transit mode restricted
/// to bus/subway/train, arrival time pinned to the upcoming Thursday 14:00.
#[derive(Debug, Clone)]
pub struct TransitMatrixClient {
    config: MatrixConfig,
    client: reqwest::blocking::Client,
}

impl TransitMatrixClient {
    pub fn new(config: MatrixConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn arrival_timestamp(&self) -> i64 {
        let arrival = next_thursday_arrival(Local::now().naive_local());
        match Local.from_local_datetime(&arrival) {
            chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
                dt.timestamp()
            }
            // DST gap; an hour later is close enough for a commute estimate.
            chrono::LocalResult::None => match Local.from_local_datetime(&(arrival + Duration::hours(1))) {
                chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
                    dt.timestamp()
                }
                chrono::LocalResult::None => Local::now().timestamp(),
            },
        }
    }
}

impl TravelTimeProvider for TransitMatrixClient {
    fn fetch(&self, origin: (f64, f64), destination: (f64, f64)) -> FetchOutcome {
        let url = format!("{}/maps/api/distancematrix/json", self.config.base_url);
        let origin_param = format!("{:.4},{:.4}", origin.0, origin.1);
        let destination_param = format!("{:.4},{:.4}", destination.0, destination.1);
        let arrival_time = self.arrival_timestamp().to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("origins", origin_param.as_str()),
                ("destinations", destination_param.as_str()),
                ("mode", "transit"),
                ("transit_mode", "bus|subway|train"),
                ("arrival_time", arrival_time.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<MatrixResponse>());

        match response {
            Ok(body) => outcome_from_response(&body),
            Err(err) => {
                warn!(
                    origin = %origin_param,
                    destination = %destination_param,
                    error = %err,
                    "distance matrix call failed"
                );
                FetchOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    duration: Option<DurationValue>,
}

#[derive(Debug, Deserialize)]
struct DurationValue {
    value: u32,
}

// Quota and transient errors arrive as HTTP 200 with an error status and no
// rows, so only a present element lacking a duration is a confirmed missing
// route. Anything else must stay retryable.
fn outcome_from_response(body: &MatrixResponse) -> FetchOutcome {
    if body.status != "OK" {
        warn!(status = %body.status, "distance matrix returned an error status");
        return FetchOutcome::Failed;
    }

    body.rows
        .first()
        .and_then(|row| row.elements.first())
        .map_or(FetchOutcome::Failed, |element| {
            element
                .duration
                .as_ref()
                .map_or(FetchOutcome::NoRoute, |duration| {
                    FetchOutcome::Duration(duration.value)
                })
        })
}

/// Next Thursday at 14:00, relative to `now`.
///
/// A fixed deterministic future reference point approximating typical
/// commute conditions. If `now` is a Thursday before 14:00, that same
/// afternoon qualifies.
pub fn next_thursday_arrival(now: NaiveDateTime) -> NaiveDateTime {
    let target = NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_else(|| now.time());
    let today = now.weekday().num_days_from_monday();
    let thursday = Weekday::Thu.num_days_from_monday();

    let mut days_ahead = i64::from((thursday + 7 - today) % 7);
    if days_ahead == 0 && now.time() >= target {
        days_ahead = 7;
    }

    (now.date() + Duration::days(days_ahead)).and_time(target)
}
