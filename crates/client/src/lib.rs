//! Remote clients for inkwell.
//!
//! This crate provides the content store client, the cache-first content
//! repository built on it, and the rate-limited AI feedback client shared by
//! the server.

pub mod feedback;
pub mod repository;
pub mod source;

pub use feedback::{Feedback, FeedbackClient, FeedbackConfig, FeedbackDispatcher, FeedbackError, ParagraphFeedback};
pub use repository::{ContentRepository, Lookup};
pub use source::{ContentSource, HttpContentSource, SourceConfig, SourceError};
