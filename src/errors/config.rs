// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading conveyor configuration files and turning them into a
//! runnable conveyor.

use thiserror::Error;

use crate::config::StageKind;
use crate::errors::ConveyorError;

/// A single semantic problem in a configuration.
///
/// The shape of the stage graph is deliberately not checked here: cycles,
/// shared queues and disconnected stages are all accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("queue capacity must be positive")]
    ZeroCapacity,

    #[error("duplicate stage id: '{stage_id}'")]
    DuplicateStageId { stage_id: String },

    #[error("stage '{stage_id}' is a {kind} and needs {expected}, got {inputs} inputs and {outputs} outputs")]
    WrongArity {
        stage_id: String,
        kind: StageKind,
        expected: &'static str,
        inputs: usize,
        outputs: usize,
    },

    #[error("stage '{stage_id}' names an empty queue")]
    EmptyQueueName { stage_id: String },

    #[error("stage '{stage_id}' uses handler '{handler}' which is not a known {kind}")]
    UnknownHandler {
        stage_id: String,
        handler: String,
        kind: StageKind,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),

    #[error("stage '{stage_id}' uses unknown handler '{handler}'")]
    UnknownHandler { stage_id: String, handler: String },

    #[error(transparent)]
    Conveyor(#[from] ConveyorError),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
