// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stage task lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A stage task was spawned and is about to call its stage function.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct StageTaskStarted<'a> {
    pub stage: &'a str,
    pub kind: &'a str,
    pub inputs: usize,
    pub outputs: usize,
}

impl Display for StageTaskStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' ({}) started: {} inputs, {} outputs",
            self.stage, self.kind, self.inputs, self.outputs
        )
    }
}

impl StructuredLog for StageTaskStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            kind = self.kind,
            inputs = self.inputs,
            outputs = self.outputs,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_task",
            span_name = name,
            stage = self.stage,
            kind = self.kind,
        )
    }
}

/// A stage function returned cleanly.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct StageTaskFinished<'a> {
    pub stage: &'a str,
    pub cancelled: bool,
    pub duration: std::time::Duration,
}

impl Display for StageTaskFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let how = if self.cancelled { "after cancellation" } else { "on exhausted input" };
        write!(f, "Stage '{}' finished {} in {:?}", self.stage, how, self.duration)
    }
}

impl StructuredLog for StageTaskFinished<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            cancelled = self.cancelled,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("stage_finished", span_name = name, stage = self.stage)
    }
}

/// A stage function returned an error.
///
/// # Log Level
/// `warn!` - The run will be cancelled; `RunFailed` reports the outcome.
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::stage::StageTaskFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "bad value");
/// let msg = StageTaskFailed {
///     stage: "prefix_decorator",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct StageTaskFailed<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StageTaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' failed: {}", self.stage, self.error)
    }
}

impl StructuredLog for StageTaskFailed<'_> {
    fn log(&self) {
        tracing::warn!(stage = self.stage, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("stage_failed", span_name = name, stage = self.stage)
    }
}

/// A stage task panicked; treated like a failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StageTaskPanicked<'a> {
    pub stage: &'a str,
}

impl Display for StageTaskPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' panicked", self.stage)
    }
}

impl StructuredLog for StageTaskPanicked<'_> {
    fn log(&self) {
        tracing::error!(stage = self.stage, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("stage_panicked", span_name = name, stage = self.stage)
    }
}
