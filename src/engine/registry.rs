// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::engine::queue::{Queue, QueueReader, QueueWriter};
use crate::errors::QueueError;
use crate::observability::messages::queue::{QueueCreated, QueueLookupFailed};
use crate::observability::messages::StructuredLog;

/// Registry of named queues sharing one capacity.
///
/// At most one queue exists per name. Queues are created lazily by
/// [`QueueRegistry::ensure`] and are only ever removed by closing them at
/// shutdown; the map itself never shrinks.
pub struct QueueRegistry {
    capacity: usize,
    queues: RwLock<HashMap<String, Arc<Queue>>>,
}

impl QueueRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1), // Ensure at least 1
            queues: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Create the queue if absent. Idempotent.
    pub fn ensure(&self, name: &str) -> Arc<Queue> {
        let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
        queues
            .entry(name.to_string())
            .or_insert_with(|| {
                QueueCreated {
                    queue: name,
                    capacity: self.capacity,
                }
                .log();
                Arc::new(Queue::new(name, self.capacity))
            })
            .clone()
    }

    /// Look up an existing queue. Never creates one.
    pub fn lookup(&self, name: &str) -> Result<Arc<Queue>, QueueError> {
        let queues = self.queues.read().unwrap_or_else(PoisonError::into_inner);
        queues.get(name).cloned().ok_or_else(|| {
            QueueLookupFailed { queue: name }.log();
            QueueError::NotFound(name.to_string())
        })
    }

    pub fn reader(&self, name: &str) -> Result<QueueReader, QueueError> {
        self.lookup(name).map(QueueReader::new)
    }

    pub fn writer(&self, name: &str) -> Result<QueueWriter, QueueError> {
        self.lookup(name).map(QueueWriter::new)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered queue names, sorted.
    pub fn names(&self) -> Vec<String> {
        let queues = self.queues.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = queues.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.queues.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every queue. Returns how many were closed by this call.
    pub async fn close_all(&self) -> usize {
        // Snapshot first: the lock must not be held across an await.
        let queues: Vec<Arc<Queue>> = self
            .queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut closed = 0;
        for queue in queues {
            if queue.close().await {
                closed += 1;
            }
        }
        closed
    }
}

impl std::fmt::Debug for QueueRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueRegistry")
            .field("capacity", &self.capacity)
            .field("queue_names", &self.names())
            .finish()
    }
}
