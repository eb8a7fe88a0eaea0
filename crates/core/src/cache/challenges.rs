//! Challenge-set cache.
//!
//! Generated writing challenges are cached per difficulty level. The level
//! is the category; the title is the display name used by text filtering.

use super::connection::CacheDb;
use super::entry::{CacheEntry, matches_filter, normalize_category, now_timestamp, parse_timestamp};
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// A writing challenge as served by the remote content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Challenge {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Remote fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Challenge {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), difficulty_level: None, description: None, extra: Default::default() }
    }
}

impl CacheDb {
    /// Read cached challenges for a difficulty level.
    ///
    /// The level is matched exactly after normalization. When `filter` is
    /// given, entries whose title contains it (case-insensitive) are kept;
    /// filtering happens after the level's rows are loaded.
    pub async fn get_cached_challenges(
        &self, level: &str, filter: Option<&str>,
    ) -> Result<Vec<CacheEntry<Challenge>>, Error> {
        let level = normalize_category(level);
        let rows = self
            .conn
            .call(move |conn| -> Result<Vec<(String, String, String, String)>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, difficulty_level, payload_json, cached_at
                    FROM challenge_cache WHERE difficulty_level = ?1 ORDER BY id",
                )?;
                let rows = stmt
                    .query_map(params![level], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)?;

        let mut entries = Vec::with_capacity(rows.len());
        for (key, category, payload_json, cached_at) in rows {
            let payload: Challenge = serde_json::from_str(&payload_json)?;
            if !matches_filter(&payload.title, filter) {
                continue;
            }
            entries.push(CacheEntry { key, payload, cached_at: parse_timestamp(&cached_at)?, category });
        }

        tracing::debug!(count = entries.len(), "challenge cache read");
        Ok(entries)
    }

    /// Upsert challenges under a difficulty level.
    ///
    /// All items are written in one transaction and share one fresh
    /// `cached_at`. Re-caching an id fully replaces the previous entry.
    pub async fn cache_challenges(&self, items: &[Challenge], level: &str) -> Result<(), Error> {
        let level = normalize_category(level);
        if level.is_empty() {
            return Err(Error::InvalidInput("challenge level cannot be empty".into()));
        }

        let rows = items
            .iter()
            .map(|c| Ok((c.id.clone(), c.title.clone(), serde_json::to_string(c)?)))
            .collect::<Result<Vec<_>, Error>>()?;
        let cached_at = now_timestamp();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO challenge_cache (id, difficulty_level, title, payload_json, cached_at)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        ON CONFLICT(id) DO UPDATE SET
                            difficulty_level = excluded.difficulty_level,
                            title = excluded.title,
                            payload_json = excluded.payload_json,
                            cached_at = excluded.cached_at",
                    )?;
                    for (id, title, payload_json) in &rows {
                        stmt.execute(params![id, level, title, payload_json, cached_at])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete cached challenges for one level, or for every level.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_challenge_cache(&self, level: Option<&str>) -> Result<u64, Error> {
        let level = level.map(normalize_category);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = match level {
                    Some(level) => conn.execute("DELETE FROM challenge_cache WHERE difficulty_level = ?1", params![level])?,
                    None => conn.execute("DELETE FROM challenge_cache", [])?,
                };
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
