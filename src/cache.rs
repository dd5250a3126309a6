//! Persistent travel-time cache.
//!
//! One storage interface, two interchangeable backends: a flat JSON document
//! and a SQLite table. Entries are append-only from the caller's point of
//! view: no TTL, no invalidation, destroyed only by deleting the store.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use tracing::warn;

use crate::coord;
use crate::travel_time::TravelTime;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write cache file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cache file {path} is not a valid JSON route map")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cache database error")]
    Sqlite(#[from] rusqlite::Error),
}

/// Key-value store of travel times, keyed by normalized coordinate fragments.
///
/// `get`/`put` take the origin and destination key fragments produced by
/// [`coord::key_fragment`]; backends compose them into one route key.
pub trait RouteCache {
    fn get(&self, origin: &str, destination: &str) -> Result<Option<TravelTime>, CacheError>;

    /// Insert or overwrite. Idempotent for an identical (key, value) pair.
    fn put(
        &mut self,
        origin: &str,
        destination: &str,
        time: TravelTime,
    ) -> Result<(), CacheError>;

    /// Durably persist all entries written so far.
    fn flush(&mut self) -> Result<(), CacheError>;
}

/// JSON-document backend: one file mapping route keys to durations
/// (`null` = unreachable). An absent file is an empty cache, not an error.
#[derive(Debug)]
pub struct JsonRouteCache {
    path: PathBuf,
    entries: HashMap<String, TravelTime>,
    dirty: bool,
}

impl JsonRouteCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| CacheError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(CacheError::Read { path, source }),
        };

        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RouteCache for JsonRouteCache {
    fn get(&self, origin: &str, destination: &str) -> Result<Option<TravelTime>, CacheError> {
        Ok(self.entries.get(&coord::route_key(origin, destination)).copied())
    }

    fn put(
        &mut self,
        origin: &str,
        destination: &str,
        time: TravelTime,
    ) -> Result<(), CacheError> {
        let previous = self
            .entries
            .insert(coord::route_key(origin, destination), time);
        if previous != Some(time) {
            self.dirty = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CacheError> {
        if !self.dirty {
            return Ok(());
        }

        let json =
            serde_json::to_string_pretty(&self.entries).map_err(|source| CacheError::Parse {
                path: self.path.clone(),
                source,
            })?;

        // Write to a sibling temp file then rename, so a crash mid-write
        // never leaves a truncated cache behind.
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json).map_err(|source| CacheError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;

        self.dirty = false;
        Ok(())
    }
}

impl Drop for JsonRouteCache {
    fn drop(&mut self) {
        // Best effort; callers that care about durability call flush()
        // themselves and observe the error.
        if let Err(err) = self.flush() {
            warn!(error = %err, "failed to flush route cache on drop");
        }
    }
}

/// SQLite backend: `routes(origin, destination, duration)` with a composite
/// primary key. `NULL` duration = unreachable. Writes autocommit, so
/// `flush()` has nothing left to do.
#[derive(Debug)]
pub struct SqliteRouteCache {
    conn: Connection,
}

impl SqliteRouteCache {
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory variant, used by tests.
    pub fn open_in_memory() -> Result<Self, CacheError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, CacheError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS routes (
                origin TEXT NOT NULL,
                destination TEXT NOT NULL,
                duration INTEGER,
                PRIMARY KEY (origin, destination)
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl RouteCache for SqliteRouteCache {
    fn get(&self, origin: &str, destination: &str) -> Result<Option<TravelTime>, CacheError> {
        let secs: Option<Option<u32>> = self
            .conn
            .query_row(
                "SELECT duration FROM routes WHERE origin = ?1 AND destination = ?2",
                (origin, destination),
                |row| row.get(0),
            )
            .optional()?;

        Ok(secs.map(|secs| secs.map_or(TravelTime::Unreachable, TravelTime::Reachable)))
    }

    fn put(
        &mut self,
        origin: &str,
        destination: &str,
        time: TravelTime,
    ) -> Result<(), CacheError> {
        self.conn.execute(
            "INSERT INTO routes (origin, destination, duration) VALUES (?1, ?2, ?3)
             ON CONFLICT (origin, destination) DO UPDATE SET duration = excluded.duration",
            (origin, destination, time.seconds()),
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CacheError> {
        Ok(())
    }
}
