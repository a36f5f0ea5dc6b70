// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::factory::{LocalStage, LocalStageFactory};
use crate::config::{validate_config, ConveyorConfig};
use crate::engine::Conveyor;
use crate::errors::ConfigError;

/// Conveyor runtime builder - turns a configuration into a registered conveyor.
///
/// Each configured stage is created through [`LocalStageFactory`] and
/// registered in configuration order. The result is ready for
/// [`Conveyor::run`].
///
/// # Examples
///
/// ```
/// use the_conveyor::config::{ConveyorConfig, RuntimeBuilder, StageConfig, StageKind};
///
/// let config = ConveyorConfig {
///     capacity: 4,
///     stages: vec![StageConfig {
///         id: "decorate".to_string(),
///         kind: StageKind::Decorator,
///         handler: "prefix_decorator".to_string(),
///         inputs: vec!["in".to_string()],
///         outputs: vec!["out".to_string()],
///     }],
/// };
///
/// let conveyor = RuntimeBuilder::from_config(&config).unwrap();
/// assert_eq!(conveyor.stage_count(), 1);
/// assert_eq!(conveyor.queue_names(), vec!["in", "out"]);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a conveyor from configuration.
    ///
    /// The configuration is validated first, so every stage handed to the
    /// conveyor has the arity its kind requires.
    pub fn from_config(cfg: &ConveyorConfig) -> Result<Conveyor, ConfigError> {
        validate_config(cfg).map_err(ConfigError::Validation)?;

        let mut conveyor = Conveyor::new(cfg.capacity);
        for stage_config in &cfg.stages {
            let inputs = stage_config.inputs.clone();
            let outputs = stage_config.outputs.clone();

            match LocalStageFactory::create_stage(stage_config)? {
                LocalStage::Decorator(decorator) => {
                    let input = inputs.into_iter().next().unwrap_or_default();
                    let output = outputs.into_iter().next().unwrap_or_default();
                    conveyor.register_decorator(decorator, input, output)?;
                }
                LocalStage::Multiplexer(multiplexer) => {
                    let output = outputs.into_iter().next().unwrap_or_default();
                    conveyor.register_multiplexer(multiplexer, inputs, output)?;
                }
                LocalStage::Separator(separator) => {
                    let input = inputs.into_iter().next().unwrap_or_default();
                    conveyor.register_separator(separator, input, outputs)?;
                }
            }
        }

        Ok(conveyor)
    }
}
