//! Transit meeting location finder CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use meet_planner::cache::{JsonRouteCache, RouteCache, SqliteRouteCache};
use meet_planner::config::PlannerConfig;
use meet_planner::provider::{MatrixConfig, TransitMatrixClient};
use meet_planner::rank::rank_destinations;
use meet_planner::report;
use meet_planner::update::update_all;

#[derive(Parser, Debug)]
#[command(author, version, about = "Transit meeting location finder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pre-populate the travel-time cache for every origin/destination pair
    UpdateRoutes(CommonArgs),
    /// Rank candidate destinations and print the most convenient ones
    FindLocations {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of top destinations to display
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the locations config file
    #[arg(long, default_value = "locations_config.json")]
    config: PathBuf,

    /// Path to the route cache store
    #[arg(long, default_value = "routes.json")]
    cache: PathBuf,

    /// Cache backend
    #[arg(long, value_enum, default_value_t = CacheBackend::Json)]
    backend: CacheBackend,

    /// Distance matrix API key; falls back to the GOOGLE_MAPS_API_KEY
    /// environment variable
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CacheBackend {
    Json,
    Sqlite,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::UpdateRoutes(common) => update_routes(&common),
        Command::FindLocations { common, top } => find_locations(&common, top),
    }
}

fn update_routes(args: &CommonArgs) -> anyhow::Result<()> {
    let config = PlannerConfig::load(&args.config)?;
    let provider = build_provider(args)?;
    let mut cache = open_cache(&args.cache, args.backend)?;

    let summary = update_all(&config, cache.as_mut(), &provider)?;
    cache.flush()?;

    println!(
        "Routes updated: {} fetched, {} already cached, {} failed",
        summary.fetched, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        println!("Run again to retry the failed pairs.");
    }
    Ok(())
}

fn find_locations(args: &CommonArgs, top: usize) -> anyhow::Result<()> {
    let config = PlannerConfig::load(&args.config)?;
    let provider = build_provider(args)?;
    let mut cache = open_cache(&args.cache, args.backend)?;

    let ranked = rank_destinations(&config, cache.as_mut(), &provider)?;
    cache.flush()?;

    print!("{}", report::format_top_destinations(&ranked, top));
    Ok(())
}

fn build_provider(args: &CommonArgs) -> anyhow::Result<TransitMatrixClient> {
    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("GOOGLE_MAPS_API_KEY").ok())
        .filter(|key| !key.is_empty())
        .context("no API key: pass --api-key or set GOOGLE_MAPS_API_KEY")?;

    TransitMatrixClient::new(MatrixConfig::new(api_key))
        .context("failed to build distance matrix client")
}

fn open_cache(path: &Path, backend: CacheBackend) -> anyhow::Result<Box<dyn RouteCache>> {
    let cache: Box<dyn RouteCache> = match backend {
        CacheBackend::Json => Box::new(
            JsonRouteCache::open(path)
                .with_context(|| format!("opening cache {}", path.display()))?,
        ),
        CacheBackend::Sqlite => Box::new(
            SqliteRouteCache::open(path)
                .with_context(|| format!("opening cache {}", path.display()))?,
        ),
    };
    Ok(cache)
}
