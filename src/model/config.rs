use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "RESYFT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_OPEN_ROUTER_API_KEY: &str = "OPEN_ROUTER_API_KEY";
const ENV_OPEN_ROUTER_MODEL: &str = "OPEN_ROUTER_MODEL";
const ENV_OPEN_ROUTER_BASE_URL: &str = "OPEN_ROUTER_BASE_URL";
const ENV_BACKEND_URL: &str = "BACKEND_URL";
const ENV_AI_SERVICE_URL: &str = "AI_SERVICE_URL";

const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";
const DEFAULT_OPEN_ROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8001";

const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 60;
const DEFAULT_SEARCH_LIMIT: u32 = 5;
const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Poll loop tuning for extraction jobs
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Random extra delay added to every attempt. Zero disables jitter.
    #[serde(default)]
    pub jitter_ms: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_max_attempts() -> u32 {
    DEFAULT_POLL_MAX_ATTEMPTS
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            jitter_ms: 0,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn jitter(&self) -> Option<Duration> {
        (self.jitter_ms > 0).then(|| Duration::from_millis(self.jitter_ms))
    }
}

/// Document search parameters used for class context retrieval
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// LLM gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// `None` when the credential is not set; rejected at startup
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub backend_url: String,
    pub ai_service_url: String,
    pub polling: PollingConfig,
    pub search: SearchConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_OPEN_ROUTER_BASE_URL.to_string(),
            },
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            ai_service_url: DEFAULT_AI_SERVICE_URL.to_string(),
            polling: PollingConfig::default(),
            search: SearchConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let gateway = GatewayConfig {
            api_key: std::env::var(ENV_OPEN_ROUTER_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var(ENV_OPEN_ROUTER_MODEL)
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var(ENV_OPEN_ROUTER_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_OPEN_ROUTER_BASE_URL.to_string()),
        };

        let backend_url =
            std::env::var(ENV_BACKEND_URL).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let ai_service_url = std::env::var(ENV_AI_SERVICE_URL)
            .unwrap_or_else(|_| DEFAULT_AI_SERVICE_URL.to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            gateway,
            backend_url: trim_trailing_slash(backend_url),
            ai_service_url: trim_trailing_slash(ai_service_url),
            polling: file.polling,
            search: file.search,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match parse_config_file(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration from file");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse YAML contents; an empty document yields the defaults
fn parse_config_file(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    let contents = contents.trim();
    if contents.is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(contents)
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config_file("   \n").unwrap();
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.polling.max_attempts, 60);
        assert_eq!(config.polling.jitter(), None);
        assert_eq!(config.search.limit, 5);
        assert!((config.search.similarity_threshold - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let yaml = r#"
polling:
  max_attempts: 10
  jitter_ms: 250
"#;
        let config = parse_config_file(yaml).unwrap();
        assert_eq!(config.polling.max_attempts, 10);
        assert_eq!(config.polling.interval(), Duration::from_secs(2));
        assert_eq!(config.polling.jitter(), Some(Duration::from_millis(250)));
        assert_eq!(config.search.limit, 5);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(parse_config_file("polling: [not, a, map").is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            trim_trailing_slash("http://localhost:8000/".to_string()),
            "http://localhost:8000"
        );
    }
}
