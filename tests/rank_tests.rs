mod fixtures;

use fixtures::{loc, MemoryCache, ScriptedProvider};
use meet_planner::config::PlannerConfig;
use meet_planner::provider::FetchOutcome;
use meet_planner::rank::rank_destinations;
use meet_planner::score::Convenience;
use meet_planner::travel_time::TravelTime;

const NYC: (f64, f64) = (40.7128, -74.0060);
const BROOKLYN: (f64, f64) = (40.6782, -73.9442);
const PHILADELPHIA: (f64, f64) = (39.9526, -75.1652);
const BOSTON: (f64, f64) = (42.3601, -71.0589);

fn two_by_two_config() -> PlannerConfig {
    PlannerConfig {
        origins: vec![
            loc("NYC", NYC.0, NYC.1),
            loc("Brooklyn", BROOKLYN.0, BROOKLYN.1),
        ],
        destinations: vec![
            loc("Philadelphia", PHILADELPHIA.0, PHILADELPHIA.1),
            loc("Boston", BOSTON.0, BOSTON.1),
        ],
    }
}

fn assert_score(score: Convenience, expected: f64) {
    match score {
        Convenience::Scored(value) => {
            assert!(
                (value - expected).abs() < 1e-9,
                "expected score {}, got {}",
                expected,
                value
            );
        }
        Convenience::Disqualified => panic!("expected score {}, got disqualified", expected),
    }
}

#[test]
fn test_ranking_from_fully_seeded_cache() {
    let config = two_by_two_config();
    let mut cache = MemoryCache::new();
    // Philadelphia: [1000, 1000] -> 1000. Boston: [500, 4000] -> 2775.
    cache.seed(NYC, PHILADELPHIA, TravelTime::Reachable(1000));
    cache.seed(BROOKLYN, PHILADELPHIA, TravelTime::Reachable(1000));
    cache.seed(NYC, BOSTON, TravelTime::Reachable(500));
    cache.seed(BROOKLYN, BOSTON, TravelTime::Reachable(4000));
    let provider = ScriptedProvider::new();

    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();

    assert_eq!(provider.call_count(), 0, "seeded cache must avoid the provider");
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].location.name, "Philadelphia");
    assert_eq!(ranked[1].location.name, "Boston");
    assert_score(ranked[0].score, 1000.0);
    assert_score(ranked[1].score, 2775.0);
}

#[test]
fn test_lower_score_ranks_first() {
    let config = two_by_two_config();
    let mut cache = MemoryCache::new();
    cache.seed(NYC, PHILADELPHIA, TravelTime::Reachable(100));
    cache.seed(BROOKLYN, PHILADELPHIA, TravelTime::Reachable(100));
    cache.seed(NYC, BOSTON, TravelTime::Reachable(50));
    cache.seed(BROOKLYN, BOSTON, TravelTime::Reachable(50));

    let ranked = rank_destinations(&config, &mut cache, &ScriptedProvider::new()).unwrap();

    assert_eq!(ranked[0].location.name, "Boston");
    assert_eq!(ranked[1].location.name, "Philadelphia");
}

#[test]
fn test_ties_keep_config_order() {
    let mut config = two_by_two_config();
    let mut cache = MemoryCache::new();
    for destination in [PHILADELPHIA, BOSTON] {
        cache.seed(NYC, destination, TravelTime::Reachable(1200));
        cache.seed(BROOKLYN, destination, TravelTime::Reachable(1200));
    }

    let ranked = rank_destinations(&config, &mut cache, &ScriptedProvider::new()).unwrap();
    assert_eq!(ranked[0].location.name, "Philadelphia");
    assert_eq!(ranked[1].location.name, "Boston");

    // Reversing the config order reverses the tied output order.
    config.destinations.reverse();
    let ranked = rank_destinations(&config, &mut cache, &ScriptedProvider::new()).unwrap();
    assert_eq!(ranked[0].location.name, "Boston");
    assert_eq!(ranked[1].location.name, "Philadelphia");
}

#[test]
fn test_unreachable_destination_sorts_last_but_stays_listed() {
    let config = two_by_two_config();
    let mut cache = MemoryCache::new();
    cache.seed(NYC, PHILADELPHIA, TravelTime::Unreachable);
    cache.seed(BROOKLYN, PHILADELPHIA, TravelTime::Unreachable);
    cache.seed(NYC, BOSTON, TravelTime::Reachable(3600));
    cache.seed(BROOKLYN, BOSTON, TravelTime::Reachable(3600));

    let ranked = rank_destinations(&config, &mut cache, &ScriptedProvider::new()).unwrap();

    assert_eq!(ranked.len(), 2, "no destination is ever dropped");
    assert_eq!(ranked[0].location.name, "Boston");
    assert_eq!(ranked[1].location.name, "Philadelphia");
    assert_eq!(ranked[1].score, Convenience::Disqualified);
}

#[test]
fn test_cache_miss_fetches_and_writes_through() {
    let config = two_by_two_config();
    let mut cache = MemoryCache::new();
    let provider = ScriptedProvider::new()
        .route(NYC, PHILADELPHIA, FetchOutcome::Duration(1000))
        .route(BROOKLYN, PHILADELPHIA, FetchOutcome::Duration(1000))
        .route(NYC, BOSTON, FetchOutcome::Duration(500))
        .route(BROOKLYN, BOSTON, FetchOutcome::Duration(4000));

    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();

    assert_eq!(provider.call_count(), 4);
    assert_eq!(cache.len(), 4);
    assert!(cache.flushes >= 2, "each destination batch is flushed");
    assert_eq!(ranked[0].location.name, "Philadelphia");

    // A second run is served entirely from the cache.
    let provider = ScriptedProvider::new();
    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();
    assert_eq!(provider.call_count(), 0);
    assert_eq!(ranked[0].location.name, "Philadelphia");
}

#[test]
fn test_confirmed_no_route_is_negatively_cached() {
    let config = two_by_two_config();
    let mut cache = MemoryCache::new();
    let provider = ScriptedProvider::new()
        .route(NYC, PHILADELPHIA, FetchOutcome::NoRoute)
        .route(BROOKLYN, PHILADELPHIA, FetchOutcome::Duration(1000))
        .route(NYC, BOSTON, FetchOutcome::Duration(500))
        .route(BROOKLYN, BOSTON, FetchOutcome::Duration(4000));

    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();
    assert_eq!(ranked[1].location.name, "Philadelphia");
    assert_eq!(ranked[1].score, Convenience::Disqualified);

    // The no-route answer was cached, so nothing is re-fetched.
    let provider = ScriptedProvider::new();
    rank_destinations(&config, &mut cache, &provider).unwrap();
    assert_eq!(provider.call_count(), 0);
}

#[test]
fn test_transient_failure_disqualifies_but_is_retried() {
    let config = two_by_two_config();
    let mut cache = MemoryCache::new();
    cache.seed(BROOKLYN, PHILADELPHIA, TravelTime::Reachable(1000));
    cache.seed(NYC, BOSTON, TravelTime::Reachable(500));
    cache.seed(BROOKLYN, BOSTON, TravelTime::Reachable(4000));
    let provider = ScriptedProvider::new().route(NYC, PHILADELPHIA, FetchOutcome::Failed);

    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();
    assert_eq!(provider.call_count(), 1);
    assert_eq!(ranked[1].score, Convenience::Disqualified);
    assert_eq!(cache.len(), 3, "a failed call must not be cached");

    // The pair is retried on the next run and can now succeed.
    let provider = ScriptedProvider::new().route(NYC, PHILADELPHIA, FetchOutcome::Duration(1000));
    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();
    assert_eq!(provider.call_count(), 1);
    assert_eq!(ranked[0].location.name, "Philadelphia");
    assert_score(ranked[0].score, 1000.0);
}

#[test]
fn test_jittered_coordinates_share_cache_entries() {
    // Coordinates differing past the second decimal map to the same key.
    let mut config = two_by_two_config();
    config.origins[0].lat = 40.71278;
    config.origins[0].lon = -74.00601;
    let mut cache = MemoryCache::new();
    cache.seed((40.7134, -74.0067), PHILADELPHIA, TravelTime::Reachable(1000));
    cache.seed(BROOKLYN, PHILADELPHIA, TravelTime::Reachable(1000));
    cache.seed((40.7134, -74.0067), BOSTON, TravelTime::Reachable(500));
    cache.seed(BROOKLYN, BOSTON, TravelTime::Reachable(4000));
    let provider = ScriptedProvider::new();

    let ranked = rank_destinations(&config, &mut cache, &provider).unwrap();

    assert_eq!(provider.call_count(), 0);
    assert_score(ranked[0].score, 1000.0);
}
