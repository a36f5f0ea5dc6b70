// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for conveyor run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run start (how many stages and queues were materialized)
//! * Run completion, failure and cancellation
//! * Coordinated shutdown of the queue registry

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Conveyor run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     stage_count: 3,
///     queue_count: 5,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted {
    pub stage_count: usize,
    pub queue_count: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting conveyor run: {} stages over {} queues",
            self.stage_count, self.queue_count
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            queue_count = self.queue_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "conveyor_run",
            span_name = name,
            stage_count = self.stage_count,
            queue_count = self.queue_count,
        )
    }
}

/// Conveyor run finished without any stage failing.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub stage_count: usize,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Conveyor run completed: {} stages in {:?}",
            self.stage_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "conveyor_run_completed",
            span_name = name,
            stage_count = self.stage_count,
            duration = ?self.duration,
        )
    }
}

/// Conveyor run aborted by the first stage failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::engine::RunFailed;
/// use std::time::Duration;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// let msg = RunFailed {
///     stage: "prefix_decorator",
///     error: &error,
///     duration: Duration::from_millis(12),
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
    pub duration: std::time::Duration,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Conveyor run failed after {:?}: first failure in stage '{}': {}",
            self.duration, self.stage, self.error
        )
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            error = %self.error,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "conveyor_run_failed",
            span_name = name,
            stage = self.stage,
            error = %self.error,
        )
    }
}

/// The shared cancellation signal was triggered and stages are being asked to stop.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct CancellationTriggered<'a> {
    pub reason: &'a str,
}

impl Display for CancellationTriggered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cancelling all conveyor stages: {}", self.reason)
    }
}

impl StructuredLog for CancellationTriggered<'_> {
    fn log(&self) {
        tracing::debug!(reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("conveyor_cancel", span_name = name, reason = self.reason)
    }
}

/// Every queue of the conveyor has been closed.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct ShutdownCompleted {
    pub queues_closed: usize,
}

impl Display for ShutdownCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Conveyor shut down: {} queues closed", self.queues_closed)
    }
}

impl StructuredLog for ShutdownCompleted {
    fn log(&self) {
        tracing::debug!(queues_closed = self.queues_closed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "conveyor_shutdown",
            span_name = name,
            queues_closed = self.queues_closed,
        )
    }
}
