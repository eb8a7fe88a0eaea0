//! Exercise-content cache.
//!
//! Rows carry an auto id, but lookups and upserts go through the compound
//! `(exercise_id, exercise_type)` key.

use super::connection::CacheDb;
use super::entry::{CacheEntry, normalize_category, now_timestamp, parse_timestamp};
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

/// Generated content for one exercise of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExerciseContent {
    pub exercise_id: String,
    pub exercise_type: String,
    /// Exercise body as produced by the content generator.
    pub content: serde_json::Value,
}

impl CacheDb {
    /// Read the cached content for an exercise and type.
    ///
    /// The type is matched after normalization. Returns None on a miss.
    pub async fn get_cached_exercise_content(
        &self, exercise_id: &str, exercise_type: &str,
    ) -> Result<Option<CacheEntry<ExerciseContent>>, Error> {
        let exercise_id = exercise_id.to_string();
        let exercise_type = normalize_category(exercise_type);
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(i64, String, String, String)>, Error> {
                let result = conn.query_row(
                    "SELECT id, exercise_type, payload_json, cached_at
                    FROM exercise_cache WHERE exercise_id = ?1 AND exercise_type = ?2",
                    params![exercise_id, exercise_type],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                );

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((id, category, payload_json, cached_at)) = row else {
            return Ok(None);
        };

        Ok(Some(CacheEntry {
            key: id.to_string(),
            payload: serde_json::from_str(&payload_json)?,
            cached_at: parse_timestamp(&cached_at)?,
            category,
        }))
    }

    /// Insert or replace the cached content for an exercise and type.
    pub async fn cache_exercise_content(&self, item: &ExerciseContent) -> Result<(), Error> {
        if item.exercise_id.trim().is_empty() {
            return Err(Error::InvalidInput("exercise_id cannot be empty".into()));
        }

        let exercise_id = item.exercise_id.clone();
        let exercise_type = normalize_category(&item.exercise_type);
        let payload_json = serde_json::to_string(item)?;
        let cached_at = now_timestamp();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO exercise_cache (exercise_id, exercise_type, payload_json, cached_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(exercise_id, exercise_type) DO UPDATE SET
                        payload_json = excluded.payload_json,
                        cached_at = excluded.cached_at",
                    params![exercise_id, exercise_type, payload_json, cached_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete cached content for one exercise (all types), or everything.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_exercise_cache(&self, exercise_id: Option<&str>) -> Result<u64, Error> {
        let exercise_id = exercise_id.map(str::to_string);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = match exercise_id {
                    Some(id) => conn.execute("DELETE FROM exercise_cache WHERE exercise_id = ?1", params![id])?,
                    None => conn.execute("DELETE FROM exercise_cache", [])?,
                };
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
