// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::{QueueError, StageError};

/// Errors surfaced by conveyor registration and `run`.
#[derive(Error, Debug)]
pub enum ConveyorError {
    /// The first stage failure observed during a run.
    #[error("conveyor error: stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: StageError,
    },

    /// A stage task panicked or was aborted before returning.
    #[error("conveyor error: stage '{stage}' panicked")]
    StagePanicked { stage: String },

    /// A stage spec that can never run, e.g. a separator with no outputs.
    #[error("invalid stage '{stage}': {reason}")]
    InvalidStage { stage: String, reason: String },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl ConveyorError {
    /// Label of the stage this error originated from, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            ConveyorError::StageFailed { stage, .. }
            | ConveyorError::StagePanicked { stage }
            | ConveyorError::InvalidStage { stage, .. } => Some(stage),
            ConveyorError::Queue(_) => None,
        }
    }

    /// The underlying stage error, if this is a stage failure.
    pub fn stage_error(&self) -> Option<&StageError> {
        match self {
            ConveyorError::StageFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
