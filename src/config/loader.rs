// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_QUEUE_CAPACITY;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Main configuration structure for a conveyor.
///
/// Describes the shared queue capacity and every stage to register. It is
/// typically loaded from a YAML or TOML file.
///
/// # Fields
/// * `capacity` - Capacity of every queue (optional, defaults to `DEFAULT_QUEUE_CAPACITY`)
/// * `stages` - Stages to register, in order
///
/// # Example
/// ```yaml
/// capacity: 4
/// stages:
///   - id: decorate
///     kind: decorator
///     handler: prefix_decorator
///     inputs: [raw]
///     outputs: [decorated]
///   - id: split
///     kind: separator
///     handler: round_robin_separator
///     inputs: [decorated]
///     outputs: [left, right]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ConveyorConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

fn default_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

/// Shape of a stage.
///
/// # Variants
/// * `Decorator` - exactly one input and one output
/// * `Multiplexer` - one or more inputs merged into one output
/// * `Separator` - one input spread over one or more outputs
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Decorator,
    Multiplexer,
    Separator,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Decorator => "decorator",
            StageKind::Multiplexer => "multiplexer",
            StageKind::Separator => "separator",
        };
        f.write_str(name)
    }
}

/// Configuration for a single stage.
///
/// # Fields
/// * `id` - Unique identifier used in validation messages
/// * `kind` - Stage shape
/// * `handler` - Name of the local stage implementation to run
/// * `inputs` - Queue names the stage reads
/// * `outputs` - Queue names the stage writes
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub id: String,
    pub kind: StageKind,
    pub handler: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Load a config from a YAML or TOML file, chosen by extension
/// (`.toml` is TOML, everything else is YAML).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConveyorConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let cfg = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Load and validate a config file.
///
/// Validation covers capacity, stage arity and handler names; see
/// [`crate::config::validate_config`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<ConveyorConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}
