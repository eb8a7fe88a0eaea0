//! Core types and shared functionality for inkwell.
//!
//! This crate provides:
//! - Text statistics and the paragraph rule
//! - Sliding-window rate limiter for AI calls
//! - Paragraph-aware feedback scheduler
//! - Cache stores with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod scheduler;
pub mod text;

pub use cache::{CacheDb, CacheEntry, Challenge, ExerciseContent, Format};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use limiter::{RateLimitConfig, RateLimiter};
pub use scheduler::{FeedbackHandler, FeedbackScheduler, FeedbackTrigger, ScheduledFeedback, SchedulerConfig};
pub use text::TextStats;
