//! Format-metadata cache.
//!
//! Single-entity get/put by id. Every entry lives in the `FORMAT` category.

use super::connection::CacheDb;
use super::entry::{CacheEntry, now_timestamp, parse_timestamp};
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

pub const FORMAT_CATEGORY: &str = "FORMAT";

/// Metadata describing a writing format (essay, email, report...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Format {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn to_entry(id: String, payload_json: &str, cached_at: &str) -> Result<CacheEntry<Format>, Error> {
    Ok(CacheEntry {
        key: id,
        payload: serde_json::from_str(payload_json)?,
        cached_at: parse_timestamp(cached_at)?,
        category: FORMAT_CATEGORY.to_string(),
    })
}

impl CacheDb {
    /// Get a cached format by id.
    pub async fn get_cached_format(&self, id: &str) -> Result<Option<CacheEntry<Format>>, Error> {
        let id = id.to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(String, String, String)>, Error> {
                let result = conn.query_row(
                    "SELECT id, payload_json, cached_at FROM format_cache WHERE id = ?1",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                );

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(|(id, payload_json, cached_at)| to_entry(id, &payload_json, &cached_at))
            .transpose()
    }

    /// List every cached format, ordered by name.
    pub async fn get_cached_formats(&self) -> Result<Vec<CacheEntry<Format>>, Error> {
        let rows = self
            .conn
            .call(|conn| -> Result<Vec<(String, String, String)>, Error> {
                let mut stmt = conn.prepare("SELECT id, payload_json, cached_at FROM format_cache ORDER BY name, id")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)?;

        rows.into_iter()
            .map(|(id, payload_json, cached_at)| to_entry(id, &payload_json, &cached_at))
            .collect()
    }

    /// Insert or replace a cached format.
    pub async fn cache_format(&self, format: &Format) -> Result<(), Error> {
        if format.id.trim().is_empty() {
            return Err(Error::InvalidInput("format id cannot be empty".into()));
        }

        let id = format.id.clone();
        let name = format.name.clone();
        let payload_json = serde_json::to_string(format)?;
        let cached_at = now_timestamp();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO format_cache (id, name, payload_json, cached_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        payload_json = excluded.payload_json,
                        cached_at = excluded.cached_at",
                    params![id, name, payload_json, cached_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every cached format.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_format_cache(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM format_cache", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_format(id: &str, name: &str) -> Format {
        Format { id: id.into(), name: name.into(), description: None, extra: Default::default() }
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let format = make_format("essay", "Essay");
        db.cache_format(&format).await.unwrap();

        let entry = db.get_cached_format("essay").await.unwrap().unwrap();
        assert_eq!(entry.payload, format);
        assert_eq!(entry.key, "essay");
        assert_eq!(entry.category, FORMAT_CATEGORY);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.get_cached_format("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.cache_format(&make_format("email", "Email")).await.unwrap();

        let mut updated = make_format("email", "Formal email");
        updated.description = Some("Letters to institutions".into());
        db.cache_format(&updated).await.unwrap();

        let all = db.get_cached_formats().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].payload, updated);
    }

    #[tokio::test]
    async fn test_list_ordered_and_clear() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.cache_format(&make_format("r", "Report")).await.unwrap();
        db.cache_format(&make_format("a", "Article")).await.unwrap();

        let names: Vec<_> = db
            .get_cached_formats()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.payload.name)
            .collect();
        assert_eq!(names, vec!["Article", "Report"]);

        assert_eq!(db.clear_format_cache().await.unwrap(), 2);
        assert!(db.get_cached_formats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        use crate::cache::Challenge;

        let db = CacheDb::open_in_memory().await.unwrap();
        db.cache_format(&make_format("shared", "Essay")).await.unwrap();
        db.cache_challenges(&[Challenge::new("shared", "Essay")], "B1")
            .await
            .unwrap();

        assert_eq!(db.clear_format_cache().await.unwrap(), 1);
        assert_eq!(db.get_cached_challenges("B1", None).await.unwrap().len(), 1);
        assert_eq!(db.clear_all().await.unwrap(), 1);
    }
}
