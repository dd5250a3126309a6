//! meet-planner core
//!
//! Picks the most convenient shared meeting location for a group by querying
//! transit travel times from each person's home to each candidate venue,
//! scoring venues by a weighted mean/worst-case travel time, and ranking them.

pub mod cache;
pub mod config;
pub mod coord;
pub mod provider;
pub mod rank;
pub mod report;
pub mod score;
pub mod travel_time;
pub mod update;
