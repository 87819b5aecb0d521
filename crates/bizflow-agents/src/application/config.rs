//! Loading agent definitions from YAML.
//!
//! ```yaml
//! agents:
//!   - id: finance-agent
//!     name: Finance Agent
//!     description: Watches cash flow
//!     model: gpt-4o-mini
//!     triggers: [finance.invoice.paid, finance.invoice.overdue]
//!     system_prompt: You are a financial controller.
//!     enabled: true
//! ```

use std::collections::HashSet;
use std::path::Path;

use bizflow_core::catalogue::EventType;
use bizflow_core::error::DomainError;
use serde::Deserialize;

use crate::domain::agent::AgentDefinition;

#[derive(Debug, Deserialize)]
struct AgentConfigFile {
    agents: Vec<AgentConfig>,
}

/// One agent entry as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Agent identifier; unique within the file.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the agent looks at.
    #[serde(default)]
    pub description: String,
    /// Model identifier.
    pub model: String,
    /// Namespaced trigger event types.
    pub triggers: Vec<String>,
    /// Fixed system prompt.
    pub system_prompt: String,
    /// Whether the agent starts enabled.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl TryFrom<AgentConfig> for AgentDefinition {
    type Error = DomainError;

    fn try_from(config: AgentConfig) -> Result<Self, Self::Error> {
        if config.triggers.is_empty() {
            return Err(DomainError::Validation(format!(
                "agent {} has no triggers",
                config.id
            )));
        }
        let triggers = config
            .triggers
            .iter()
            .map(|name| name.parse::<EventType>())
            .collect::<Result<Vec<_>, _>>()?;

        let agent = Self::new(
            config.id,
            config.name,
            config.description,
            config.model,
            triggers,
            config.system_prompt,
        );
        Ok(if config.enabled { agent } else { agent.disabled() })
    }
}

/// Parses agent definitions from YAML text.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the YAML is malformed, an agent id
/// repeats, an agent has no triggers, or a trigger names an unknown event
/// type.
pub fn parse_agent_definitions(yaml: &str) -> Result<Vec<AgentDefinition>, DomainError> {
    let file: AgentConfigFile = serde_yaml::from_str(yaml)
        .map_err(|err| DomainError::Validation(format!("invalid agent configuration: {err}")))?;

    let mut seen = HashSet::new();
    file.agents
        .into_iter()
        .map(|config| {
            if !seen.insert(config.id.clone()) {
                return Err(DomainError::Validation(format!(
                    "duplicate agent id: {}",
                    config.id
                )));
            }
            AgentDefinition::try_from(config)
        })
        .collect()
}

/// Reads and parses an agent definition file.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read, or any
/// error of [`parse_agent_definitions`].
pub fn load_agent_definitions(path: &Path) -> Result<Vec<AgentDefinition>, DomainError> {
    let yaml = std::fs::read_to_string(path).map_err(|err| {
        DomainError::Infrastructure(format!("reading {}: {err}", path.display()))
    })?;
    parse_agent_definitions(&yaml)
}
