//! Shared server state built from configuration.

use std::sync::Arc;

use inkwell_client::{ContentRepository, FeedbackClient, FeedbackConfig, HttpContentSource, SourceConfig};
use inkwell_core::{AppConfig, CacheDb, Error, RateLimiter};

/// Long-lived services behind the tools.
///
/// Remote services are optional: a server without a content store URL or a
/// feedback URL still serves the offline tools, and the remote tools report
/// what is missing.
pub struct AppState {
    pub config: AppConfig,
    pub cache: CacheDb,
    pub limiter: Arc<RateLimiter>,
    repository: Option<ContentRepository>,
    feedback: Option<FeedbackClient>,
}

impl AppState {
    pub fn build(config: AppConfig, cache: CacheDb) -> Result<Self, Error> {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit()));

        let repository = match &config.content_base_url {
            Some(base_url) => {
                let source = HttpContentSource::new(SourceConfig {
                    base_url: base_url.clone(),
                    api_key: config.content_api_key.clone(),
                    timeout: config.timeout(),
                    user_agent: config.user_agent.clone(),
                })?;
                Some(ContentRepository::new(cache.clone(), Arc::new(source)).with_max_age(config.cache_max_age()))
            }
            None => None,
        };

        let feedback = match &config.feedback_url {
            Some(url) => Some(FeedbackClient::new(
                FeedbackConfig {
                    url: url.clone(),
                    api_key: config.feedback_api_key.clone(),
                    timeout: config.timeout(),
                    user_agent: config.user_agent.clone(),
                },
                limiter.clone(),
            )?),
            None => None,
        };

        Ok(Self { config, cache, limiter, repository, feedback })
    }

    pub fn repository(&self) -> Result<&ContentRepository, Error> {
        match &self.repository {
            Some(repository) => Ok(repository),
            None => Err(missing(self.config.require_content_base_url().err())),
        }
    }

    pub fn feedback(&self) -> Result<&FeedbackClient, Error> {
        match &self.feedback {
            Some(client) => Ok(client),
            None => Err(missing(self.config.require_feedback_url().err())),
        }
    }
}

fn missing(err: Option<inkwell_core::ConfigError>) -> Error {
    match err {
        Some(e) => Error::InvalidInput(e.to_string()),
        None => Error::InvalidInput("service not configured".into()),
    }
}
