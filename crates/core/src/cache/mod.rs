//! SQLite-backed cache for content fetched from the remote store.
//!
//! One database holds three independent stores, each in its own table:
//!
//! - challenge sets, partitioned by difficulty level
//! - exercise content, keyed by `(exercise_id, exercise_type)`
//! - format metadata, keyed by id
//!
//! Writes are upserts. Entries are never expired implicitly; they stay until
//! an explicit clear.

pub mod challenges;
pub mod connection;
pub mod entry;
pub mod exercises;
pub mod formats;
pub mod migrations;

pub use crate::Error;

pub use challenges::Challenge;
pub use connection::CacheDb;
pub use entry::{CacheEntry, matches_filter, normalize_category};
pub use exercises::ExerciseContent;
pub use formats::{FORMAT_CATEGORY, Format};
