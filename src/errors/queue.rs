// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by named queue access.

use thiserror::Error;

/// Failures when reaching a queue by name or writing into it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// No stage registered a queue with this name.
    #[error("queue '{0}' not found")]
    NotFound(String),

    /// The queue was closed by conveyor shutdown.
    #[error("queue '{0}' is closed")]
    Closed(String),
}

impl QueueError {
    /// Name of the queue the error refers to.
    pub fn queue_name(&self) -> &str {
        match self {
            QueueError::NotFound(name) | QueueError::Closed(name) => name,
        }
    }
}
