// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::backends::local::LocalStageFactory;
use crate::config::{ConveyorConfig, StageConfig, StageKind};
use crate::errors::ValidationError;

/// Validate a conveyor configuration.
///
/// Checks, collecting every problem rather than stopping at the first:
/// * capacity is positive
/// * stage ids are unique
/// * each stage has the arity its kind requires
/// * no queue name is empty
/// * each handler is a known local stage of the configured kind
///
/// The graph formed by queue names is not validated.
pub fn validate_config(config: &ConveyorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.capacity == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }

    let mut seen_ids = HashSet::new();
    for stage in &config.stages {
        if !seen_ids.insert(stage.id.as_str()) {
            errors.push(ValidationError::DuplicateStageId {
                stage_id: stage.id.clone(),
            });
        }

        if let Some(error) = check_arity(stage) {
            errors.push(error);
        }

        if stage
            .inputs
            .iter()
            .chain(stage.outputs.iter())
            .any(|name| name.trim().is_empty())
        {
            errors.push(ValidationError::EmptyQueueName {
                stage_id: stage.id.clone(),
            });
        }

        if !LocalStageFactory::is_implementation_available(&stage.handler, stage.kind) {
            errors.push(ValidationError::UnknownHandler {
                stage_id: stage.id.clone(),
                handler: stage.handler.clone(),
                kind: stage.kind,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_arity(stage: &StageConfig) -> Option<ValidationError> {
    let inputs = stage.inputs.len();
    let outputs = stage.outputs.len();

    let (ok, expected) = match stage.kind {
        StageKind::Decorator => (inputs == 1 && outputs == 1, "exactly one input and one output"),
        StageKind::Multiplexer => (inputs >= 1 && outputs == 1, "at least one input and exactly one output"),
        StageKind::Separator => (inputs == 1 && outputs >= 1, "exactly one input and at least one output"),
    };

    if ok {
        None
    } else {
        Some(ValidationError::WrongArity {
            stage_id: stage.id.clone(),
            kind: stage.kind,
            expected,
            inputs,
            outputs,
        })
    }
}
