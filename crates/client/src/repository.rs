//! Read-through access to remote content via the local cache.
//!
//! The cache is an optimization, not a source of truth:
//!
//! - a failed cache read is logged and treated as a miss
//! - a failed cache write is logged and the fetched data is still returned
//! - a failed remote fetch is returned unchanged and never touches the cache

use std::sync::Arc;

use inkwell_core::cache::{CacheEntry, matches_filter, normalize_category};
use inkwell_core::{CacheDb, Challenge, Error, ExerciseContent, Format};
use serde::Serialize;

use crate::source::ContentSource;

/// A lookup result and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup<T> {
    pub value: T,
    pub cache_hit: bool,
}

impl<T> Lookup<T> {
    fn cached(value: T) -> Self {
        Self { value, cache_hit: true }
    }

    fn fetched(value: T) -> Self {
        Self { value, cache_hit: false }
    }
}

/// Cache-first content access shared by every consumer of remote content.
#[derive(Clone)]
pub struct ContentRepository {
    db: CacheDb,
    source: Arc<dyn ContentSource>,
    max_age: Option<chrono::Duration>,
}

impl ContentRepository {
    pub fn new(db: CacheDb, source: Arc<dyn ContentSource>) -> Self {
        Self { db, source, max_age: None }
    }

    /// Treat entries older than `max_age` as misses. They are refetched and
    /// overwritten, never deleted.
    pub fn with_max_age(mut self, max_age: Option<chrono::Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    fn is_fresh<T>(&self, entry: &CacheEntry<T>) -> bool {
        self.max_age.is_none_or(|max_age| !entry.is_older_than(max_age))
    }

    /// Challenges for a level, optionally filtered by title.
    ///
    /// The whole level is read and fetched; the filter is applied in memory
    /// afterwards, so a filter that matches nothing is not a cache miss.
    pub async fn challenges(
        &self, level: &str, filter: Option<&str>, force_refresh: bool,
    ) -> Result<Lookup<Vec<Challenge>>, Error> {
        let level = normalize_category(level);
        if level.is_empty() {
            return Err(Error::InvalidInput("level cannot be empty".into()));
        }

        if !force_refresh {
            match self.db.get_cached_challenges(&level, None).await {
                Ok(entries) if !entries.is_empty() && entries.iter().all(|e| self.is_fresh(e)) => {
                    tracing::debug!(level = %level, count = entries.len(), "challenge cache hit");
                    let items = entries
                        .into_iter()
                        .map(CacheEntry::into_payload)
                        .filter(|c| matches_filter(&c.title, filter))
                        .collect();
                    return Ok(Lookup::cached(items));
                }
                Ok(_) => tracing::debug!(level = %level, "challenge cache miss"),
                Err(e) => tracing::warn!(level = %level, "challenge cache read failed, fetching remotely: {}", e),
            }
        }

        let fetched = self.source.fetch_challenges(&level).await?;

        if let Err(e) = self.db.cache_challenges(&fetched, &level).await {
            tracing::warn!(level = %level, "failed to cache challenges: {}", e);
        }

        let items = fetched
            .into_iter()
            .filter(|c| matches_filter(&c.title, filter))
            .collect();
        Ok(Lookup::fetched(items))
    }

    /// Content for one exercise and type.
    pub async fn exercise_content(
        &self, exercise_id: &str, exercise_type: &str, force_refresh: bool,
    ) -> Result<Lookup<ExerciseContent>, Error> {
        if !force_refresh {
            match self.db.get_cached_exercise_content(exercise_id, exercise_type).await {
                Ok(Some(entry)) if self.is_fresh(&entry) => {
                    tracing::debug!(exercise_id, exercise_type, "exercise cache hit");
                    return Ok(Lookup::cached(entry.payload));
                }
                Ok(_) => tracing::debug!(exercise_id, exercise_type, "exercise cache miss"),
                Err(e) => tracing::warn!(exercise_id, "exercise cache read failed, fetching remotely: {}", e),
            }
        }

        let fetched = self
            .source
            .fetch_exercise_content(exercise_id, exercise_type)
            .await?;

        if let Err(e) = self.db.cache_exercise_content(&fetched).await {
            tracing::warn!(exercise_id, "failed to cache exercise content: {}", e);
        }

        Ok(Lookup::fetched(fetched))
    }

    /// One format by id.
    pub async fn format(&self, id: &str, force_refresh: bool) -> Result<Lookup<Format>, Error> {
        if !force_refresh {
            match self.db.get_cached_format(id).await {
                Ok(Some(entry)) if self.is_fresh(&entry) => {
                    tracing::debug!(format_id = id, "format cache hit");
                    return Ok(Lookup::cached(entry.payload));
                }
                Ok(_) => tracing::debug!(format_id = id, "format cache miss"),
                Err(e) => tracing::warn!(format_id = id, "format cache read failed, fetching remotely: {}", e),
            }
        }

        let fetched = self.source.fetch_format(id).await?;

        if let Err(e) = self.db.cache_format(&fetched).await {
            tracing::warn!(format_id = id, "failed to cache format: {}", e);
        }

        Ok(Lookup::fetched(fetched))
    }
}
