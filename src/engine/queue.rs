// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded, named FIFO queues of string values.
//!
//! A [`Queue`] is a tokio `mpsc` channel that can be shared by any number of
//! writers and readers. Closing is explicit and happens once, at conveyor
//! shutdown:
//!
//! 1. The per-queue closed signal fires. Senders blocked on a full queue and
//!    receivers blocked on an empty one wake up immediately.
//! 2. The receiving half is closed so no value can slip in afterwards.
//!
//! Values already buffered at close time remain drainable; once drained,
//! [`Queue::recv`] returns `None`.
//!
//! Stage functions never see a [`Queue`] directly. They get a [`QueueReader`]
//! for each declared input and a [`QueueWriter`] for each declared output.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::errors::QueueError;
use crate::observability::messages::{queue::QueueClosed, StructuredLog};

pub struct Queue {
    name: String,
    sender: mpsc::Sender<String>,
    receiver: Mutex<mpsc::Receiver<String>>,
    closed: CancellationToken,
    shut: AtomicBool,
}

impl Queue {
    /// Create an open queue. A capacity of zero is raised to one.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            name: name.into(),
            sender,
            receiver: Mutex::new(receiver),
            closed: CancellationToken::new(),
            shut: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Number of values currently buffered.
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Enqueue a value, waiting while the queue is full.
    ///
    /// Fails with [`QueueError::Closed`] if the queue is already closed or is
    /// closed while this call is waiting for room.
    pub async fn send(&self, value: String) -> Result<(), QueueError> {
        if self.closed.is_cancelled() {
            return Err(self.closed_error());
        }

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(self.closed_error()),
            result = self.sender.send(value) => result.map_err(|_| self.closed_error()),
        }
    }

    /// Dequeue the next value, waiting while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<String> {
        let mut receiver = self.receiver.lock().await;

        tokio::select! {
            biased;
            value = receiver.recv() => value,
            _ = self.closed.cancelled() => receiver.try_recv().ok(),
        }
    }

    /// Close the queue. Returns `false` if it had already been closed.
    pub async fn close(&self) -> bool {
        if self.shut.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.closed.cancel();
        let mut receiver = self.receiver.lock().await;
        receiver.close();

        QueueClosed {
            queue: &self.name,
            undelivered: self.len(),
        }
        .log();

        true
    }

    fn closed_error(&self) -> QueueError {
        QueueError::Closed(self.name.clone())
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Read side of a queue handed to a stage function.
#[derive(Debug, Clone)]
pub struct QueueReader {
    queue: Arc<Queue>,
}

impl QueueReader {
    pub fn new(queue: Arc<Queue>) -> Self {
        Self { queue }
    }

    pub fn name(&self) -> &str {
        self.queue.name()
    }

    /// See [`Queue::recv`].
    pub async fn recv(&self) -> Option<String> {
        self.queue.recv().await
    }

    /// Receive the next value unless `cancel` fires first.
    ///
    /// `None` means the stage should stop: either the run was cancelled or
    /// the queue is closed and drained.
    pub async fn recv_until(&self, cancel: &CancellationToken) -> Option<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            value = self.queue.recv() => value,
        }
    }
}

/// Write side of a queue handed to a stage function.
#[derive(Debug, Clone)]
pub struct QueueWriter {
    queue: Arc<Queue>,
}

impl QueueWriter {
    pub fn new(queue: Arc<Queue>) -> Self {
        Self { queue }
    }

    pub fn name(&self) -> &str {
        self.queue.name()
    }

    /// See [`Queue::send`].
    pub async fn send(&self, value: impl Into<String>) -> Result<(), QueueError> {
        self.queue.send(value.into()).await
    }

    /// Send a value unless `cancel` fires first.
    ///
    /// Returns `Ok(false)` when cancelled before the value was enqueued.
    pub async fn send_until(
        &self,
        cancel: &CancellationToken,
        value: impl Into<String>,
    ) -> Result<bool, QueueError> {
        let value = value.into();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(false),
            result = self.queue.send(value) => result.map(|_| true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_values_come_out_in_send_order() {
        let queue = Queue::new("q", 4);
        for value in ["one", "two", "three"] {
            queue.send(value.to_string()).await.unwrap();
        }

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.recv().await.as_deref(), Some("one"));
        assert_eq!(queue.recv().await.as_deref(), Some("two"));
        assert_eq!(queue.recv().await.as_deref(), Some("three"));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let queue = Queue::new("q", 0);
        assert_eq!(queue.capacity(), 1);
    }

    #[tokio::test]
    async fn test_send_blocks_while_full() {
        let queue = Queue::new("q", 1);
        queue.send("first".to_string()).await.unwrap();

        let blocked = timeout(Duration::from_millis(50), queue.send("second".to_string())).await;
        assert!(blocked.is_err(), "send on a full queue should wait");
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_sender_with_error() {
        let queue = Arc::new(Queue::new("q", 1));
        queue.send("first".to_string()).await.unwrap();

        let sender = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.send("second".to_string()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(queue.close().await);
        let result = timeout(WAIT, sender).await.unwrap().unwrap();
        assert_eq!(result, Err(QueueError::Closed("q".to_string())));
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_receiver() {
        let queue = Arc::new(Queue::new("q", 1));

        let receiver = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(queue.close().await);
        let value = timeout(WAIT, receiver).await.unwrap().unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_buffered_values_survive_close_then_recv_reports_closed() {
        let queue = Queue::new("q", 2);
        queue.send("kept".to_string()).await.unwrap();
        queue.close().await;

        assert_eq!(queue.recv().await.as_deref(), Some("kept"));
        assert_eq!(queue.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_after_close_fails_and_close_is_once() {
        let queue = Queue::new("q", 2);
        assert!(queue.close().await);
        assert!(!queue.close().await);

        let result = queue.send("late".to_string()).await;
        assert_eq!(result, Err(QueueError::Closed("q".to_string())));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_a_legitimate_undefined_payload_is_not_mistaken_for_closed() {
        let queue = Queue::new("q", 1);
        queue.send("undefined".to_string()).await.unwrap();
        assert_eq!(queue.recv().await.as_deref(), Some("undefined"));
    }

    #[tokio::test]
    async fn test_reader_and_writer_observe_cancellation() {
        let queue = Arc::new(Queue::new("q", 1));
        let reader = QueueReader::new(queue.clone());
        let writer = QueueWriter::new(queue.clone());
        let cancel = CancellationToken::new();

        assert!(writer.send_until(&cancel, "fill").await.unwrap());
        cancel.cancel();

        assert_eq!(timeout(WAIT, writer.send_until(&cancel, "more")).await.unwrap(), Ok(false));
        assert_eq!(reader.name(), "q");
        assert_eq!(timeout(WAIT, reader.recv_until(&cancel)).await.unwrap(), None);
        assert!(!queue.is_closed());
    }
}
