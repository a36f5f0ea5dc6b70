// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors returned by stage functions.
//!
//! Any error a stage returns is fatal to the whole run: the conveyor cancels
//! every sibling stage and reports the first one it observed.

use thiserror::Error;

use crate::errors::QueueError;

#[derive(Error, Debug)]
pub enum StageError {
    /// The prefix decorator refused a value carrying its rejection marker.
    #[error("can't be decorated: {0}")]
    CannotDecorate(String),

    /// A queue the stage writes to went away underneath it.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Anything raised by caller-defined stages.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
