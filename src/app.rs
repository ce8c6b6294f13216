//! Application state and service initialization
//!
//! This module centralizes service construction and dependency injection, so
//! handlers only ever see ready-made services.

use std::sync::Arc;

use actix_web::web;
use url::Url;

use crate::model::Config;
use crate::service::extraction::PollPolicy;
use crate::service::{
    ChatOrchestrator, ClassServiceClient, ExtractionJobClient, HttpExtractionBackend,
    OpenRouterClient, ToolRegistry,
};

/// Application state containing all services shared by the workers
#[derive(Clone)]
pub struct AppState {
    /// Chat tool-calling loop
    pub chat: web::Data<ChatOrchestrator>,
    /// Extraction job submitter and poller
    pub extraction: web::Data<ExtractionJobClient>,
    /// Class management proxy
    pub classes: web::Data<ClassServiceClient>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Fails when the gateway credential is missing or a service URL does not parse.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let api_key = config
            .gateway
            .api_key
            .as_deref()
            .ok_or(AppError::MissingConfig("OPEN_ROUTER_API_KEY"))?;

        check_url(&config.gateway.base_url, "OPEN_ROUTER_BASE_URL")?;
        check_url(&config.backend_url, "BACKEND_URL")?;
        check_url(&config.ai_service_url, "AI_SERVICE_URL")?;

        let policy = PollPolicy::from(&config.polling);
        let extraction = Arc::new(ExtractionJobClient::new(
            Arc::new(HttpExtractionBackend::new(&config.backend_url)),
            policy,
        ));

        let registry = Arc::new(
            ToolRegistry::with_builtin_tools(Arc::clone(&extraction))
                .map_err(|_| AppError::InvalidConfig("tool registry"))?,
        );

        let classes = Arc::new(ClassServiceClient::new(&config.ai_service_url));

        let chat = ChatOrchestrator::new(
            Arc::new(OpenRouterClient::new(api_key, &config.gateway)),
            Arc::clone(&registry),
            &config.gateway.model,
        )
        .with_search(classes.clone(), config.search.clone());

        tracing::info!(
            model = %config.gateway.model,
            backend_url = %config.backend_url,
            ai_service_url = %config.ai_service_url,
            poll_interval_ms = config.polling.interval_ms,
            poll_max_attempts = config.polling.max_attempts,
            tools = registry.len(),
            "Services initialized"
        );

        Ok(Self {
            chat: web::Data::new(chat),
            extraction: web::Data::from(extraction),
            classes: web::Data::from(classes),
        })
    }
}

fn check_url(value: &str, name: &'static str) -> Result<(), AppError> {
    match Url::parse(value) {
        Ok(url) if !url.cannot_be_a_base() => Ok(()),
        _ => Err(AppError::InvalidConfig(name)),
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> Config {
        let mut config = Config::default();
        config.gateway.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = AppState::new(Config::default()).err().unwrap();
        assert!(matches!(err, AppError::MissingConfig("OPEN_ROUTER_API_KEY")));
    }

    #[test]
    fn test_invalid_backend_url_rejected() {
        let mut config = config_with_key();
        config.backend_url = "not a url".to_string();
        let err = AppState::new(config).err().unwrap();
        assert!(matches!(err, AppError::InvalidConfig("BACKEND_URL")));
    }

    #[test]
    fn test_service_url_must_take_path_segments() {
        let mut config = config_with_key();
        config.ai_service_url = "mailto:ops@resyft.com".to_string();
        let err = AppState::new(config).err().unwrap();
        assert!(matches!(err, AppError::InvalidConfig("AI_SERVICE_URL")));
    }

    #[test]
    fn test_state_builds_with_builtin_tools() {
        let state = AppState::new(config_with_key()).unwrap();
        assert_eq!(state.chat.registry().len(), 4);
    }
}
