//! Process configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bizflow_runtime::CoreConfig;

use crate::error::AppError;

/// Default base URL of the OpenAI-compatible completion endpoint.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Everything the server reads at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Reactive core capacities and limits.
    pub core: CoreConfig,
    /// YAML file with agent definitions; built-in agents when unset.
    pub agents_config: Option<PathBuf>,
    /// Completion endpoint base URL.
    pub llm_base_url: String,
    /// Completion API key; agents cannot reach a model when unset.
    pub llm_api_key: Option<String>,
    /// Per-request completion timeout.
    pub llm_timeout: Duration,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = CoreConfig::default();
        let core = CoreConfig {
            event_history_capacity: positive(
                "EVENT_HISTORY_CAPACITY",
                parse(&lookup, "EVENT_HISTORY_CAPACITY", defaults.event_history_capacity)?,
            )?,
            propagation_log_capacity: positive(
                "PROPAGATION_LOG_CAPACITY",
                parse(&lookup, "PROPAGATION_LOG_CAPACITY", defaults.propagation_log_capacity)?,
            )?,
            agent_history_capacity: positive(
                "AGENT_HISTORY_CAPACITY",
                parse(&lookup, "AGENT_HISTORY_CAPACITY", defaults.agent_history_capacity)?,
            )?,
            max_cascade_depth: parse(&lookup, "MAX_CASCADE_DEPTH", defaults.max_cascade_depth)?,
            agent_temperature: parse(&lookup, "AGENT_TEMPERATURE", defaults.agent_temperature)?,
        };
        if !(0.0..=2.0).contains(&core.agent_temperature) {
            return Err(AppError::Config(format!(
                "AGENT_TEMPERATURE must be between 0 and 2, got {}",
                core.agent_temperature
            )));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&lookup, "PORT", 3000)?,
            core,
            agents_config: lookup("AGENTS_CONFIG").map(PathBuf::from),
            llm_base_url: lookup("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_api_key: lookup("LLM_API_KEY").filter(|key| !key.is_empty()),
            llm_timeout: Duration::from_secs(parse(&lookup, "LLM_TIMEOUT_SECS", 60)?),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|url| !url.is_empty()),
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid ({raw:?}): {e}"))),
        None => Ok(default),
    }
}

fn positive(key: &str, value: usize) -> Result<usize, AppError> {
    if value == 0 {
        return Err(AppError::Config(format!("{key} must be greater than zero")));
    }
    Ok(value)
}
