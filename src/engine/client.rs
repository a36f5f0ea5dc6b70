// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::engine::registry::QueueRegistry;
use crate::errors::QueueError;

/// Handle external producers and consumers use to reach a conveyor's queues.
///
/// Obtained from [`crate::engine::Conveyor::client`] before `run` consumes the
/// conveyor. Cloning is cheap and every clone talks to the same queues. The
/// client stays usable after the run returns: by then every queue is closed,
/// so `send` fails with [`QueueError::Closed`] and `recv` drains whatever was
/// left before reporting `None`.
#[derive(Clone, Debug)]
pub struct ConveyorClient {
    queues: Arc<QueueRegistry>,
}

impl ConveyorClient {
    pub(crate) fn new(queues: Arc<QueueRegistry>) -> Self {
        Self { queues }
    }

    /// Enqueue `value` on the named queue, waiting while it is full.
    pub async fn send(&self, queue: &str, value: impl Into<String>) -> Result<(), QueueError> {
        let target = self.queues.lookup(queue)?;
        target.send(value.into()).await
    }

    /// Dequeue the next value from the named queue, waiting while it is empty.
    ///
    /// `Ok(None)` means the queue has been closed and drained.
    pub async fn recv(&self, queue: &str) -> Result<Option<String>, QueueError> {
        let source = self.queues.lookup(queue)?;
        Ok(source.recv().await)
    }

    pub fn has_queue(&self, queue: &str) -> bool {
        self.queues.contains(queue)
    }

    pub fn queue_names(&self) -> Vec<String> {
        self.queues.names()
    }
}
