//! Shared test doubles: an in-memory cache and a scripted provider.

use std::cell::RefCell;
use std::collections::HashMap;

use meet_planner::cache::{CacheError, RouteCache};
use meet_planner::config::Location;
use meet_planner::coord;
use meet_planner::provider::{FetchOutcome, TravelTimeProvider};
use meet_planner::travel_time::TravelTime;

pub fn loc(name: &str, lat: f64, lon: f64) -> Location {
    Location {
        name: name.to_string(),
        lat,
        lon,
    }
}

/// Cache backed by a plain map, with flush counting for write-through
/// assertions.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, TravelTime>,
    pub flushes: usize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&mut self, origin: (f64, f64), destination: (f64, f64), time: TravelTime) {
        let key = coord::route_key(
            &coord::key_fragment(origin.0, origin.1),
            &coord::key_fragment(destination.0, destination.1),
        );
        self.entries.insert(key, time);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl RouteCache for MemoryCache {
    fn get(&self, origin: &str, destination: &str) -> Result<Option<TravelTime>, CacheError> {
        Ok(self
            .entries
            .get(&coord::route_key(origin, destination))
            .copied())
    }

    fn put(
        &mut self,
        origin: &str,
        destination: &str,
        time: TravelTime,
    ) -> Result<(), CacheError> {
        self.entries
            .insert(coord::route_key(origin, destination), time);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CacheError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Provider returning pre-scripted outcomes per (origin, destination) pair,
/// counting every call. Unscripted pairs fail transiently.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    outcomes: HashMap<String, FetchOutcome>,
    calls: RefCell<usize>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        mut self,
        origin: (f64, f64),
        destination: (f64, f64),
        outcome: FetchOutcome,
    ) -> Self {
        let key = coord::route_key(
            &coord::key_fragment(origin.0, origin.1),
            &coord::key_fragment(destination.0, destination.1),
        );
        self.outcomes.insert(key, outcome);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl TravelTimeProvider for ScriptedProvider {
    fn fetch(&self, origin: (f64, f64), destination: (f64, f64)) -> FetchOutcome {
        *self.calls.borrow_mut() += 1;
        let key = coord::route_key(
            &coord::key_fragment(origin.0, origin.1),
            &coord::key_fragment(destination.0, destination.1),
        );
        self.outcomes
            .get(&key)
            .copied()
            .unwrap_or(FetchOutcome::Failed)
    }
}
