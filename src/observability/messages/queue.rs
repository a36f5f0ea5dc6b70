// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for queue registry events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A queue was materialized in the registry.
///
/// # Log Level
/// `trace!` - Fine-grained diagnostic
pub struct QueueCreated<'a> {
    pub queue: &'a str,
    pub capacity: usize,
}

impl Display for QueueCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queue '{}' created with capacity {}", self.queue, self.capacity)
    }
}

impl StructuredLog for QueueCreated<'_> {
    fn log(&self) {
        tracing::trace!(queue = self.queue, capacity = self.capacity, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("queue_created", span_name = name, queue = self.queue)
    }
}

/// A client asked for a queue no stage registered.
///
/// # Log Level
/// `warn!` - Caller error
pub struct QueueLookupFailed<'a> {
    pub queue: &'a str,
}

impl Display for QueueLookupFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queue '{}' is not registered", self.queue)
    }
}

impl StructuredLog for QueueLookupFailed<'_> {
    fn log(&self) {
        tracing::warn!(queue = self.queue, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("queue_lookup_failed", span_name = name, queue = self.queue)
    }
}

/// A queue was closed during shutdown.
///
/// # Log Level
/// `trace!` - Fine-grained diagnostic
pub struct QueueClosed<'a> {
    pub queue: &'a str,
    pub undelivered: usize,
}

impl Display for QueueClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queue '{}' closed with {} undelivered values",
            self.queue, self.undelivered
        )
    }
}

impl StructuredLog for QueueClosed<'_> {
    fn log(&self) {
        tracing::trace!(queue = self.queue, undelivered = self.undelivered, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("queue_closed", span_name = name, queue = self.queue)
    }
}
