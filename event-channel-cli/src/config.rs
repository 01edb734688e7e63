//! Scenario loading and validation

use crate::error::{Result as ScenarioResult, ScenarioError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A scenario (loaded from a .toml file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub channel: ChannelConfig,
    #[serde(default)]
    pub listeners: Vec<ListenerConfig>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelConfig {
    pub name: String,
}

/// A named listener that records every invocation it receives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    pub name: String,
    /// Channel mutations performed each time this listener fires
    #[serde(default)]
    pub on_fire: Vec<Reaction>,
}

/// One step of the scenario, applied in file order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepConfig {
    Add {
        listener: String,
    },
    Remove {
        listener: String,
    },
    /// Remove the registration created by the n-th `add` of a listener
    RemoveId {
        listener: String,
        #[serde(default = "default_occurrence")]
        occurrence: usize,
    },
    Invoke {
        #[serde(default)]
        payload: String,
    },
    Clear,
}

fn default_occurrence() -> usize {
    1
}

/// Mutation a listener applies to its own channel while being invoked
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Reaction {
    Add { listener: String },
    Remove { listener: String },
}

impl Reaction {
    pub fn listener(&self) -> &str {
        match self {
            Reaction::Add { listener } | Reaction::Remove { listener } => listener,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl ScenarioConfig {
    /// Check that listener names are unique and every reference resolves
    pub fn validate(&self) -> ScenarioResult<()> {
        let mut names = HashSet::new();
        for listener in &self.listeners {
            if !names.insert(listener.name.as_str()) {
                return Err(ScenarioError::DuplicateListener(listener.name.clone()));
            }
        }

        let check = |name: &str, context: String| -> ScenarioResult<()> {
            if names.contains(name) {
                Ok(())
            } else {
                Err(ScenarioError::UnknownListener {
                    name: name.to_string(),
                    context,
                })
            }
        };

        for listener in &self.listeners {
            for reaction in &listener.on_fire {
                check(reaction.listener(), format!("listener '{}'", listener.name))?;
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            let step_no = index + 1;
            match step {
                StepConfig::Add { listener } | StepConfig::Remove { listener } => {
                    check(listener.as_str(), format!("step {}", step_no))?;
                }
                StepConfig::RemoveId {
                    listener,
                    occurrence,
                } => {
                    check(listener.as_str(), format!("step {}", step_no))?;
                    if *occurrence == 0 {
                        return Err(ScenarioError::InvalidOccurrence {
                            listener: listener.clone(),
                            occurrence: *occurrence,
                        });
                    }
                }
                StepConfig::Invoke { .. } | StepConfig::Clear => {}
            }
        }

        Ok(())
    }
}

/// Load and validate a scenario from a TOML file
pub fn load_config(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

    let config: ScenarioConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid scenario: {:?}", path))?;

    log::debug!(
        "Scenario '{}': {} listener(s), {} step(s)",
        config.channel.name,
        config.listeners.len(),
        config.steps.len()
    );
    Ok(config)
}
