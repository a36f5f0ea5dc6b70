// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The three stage shapes a conveyor can run.
//!
//! Every stage function receives the run's shared cancellation token and
//! handles scoped to exactly the queues it was registered with. A stage
//! should return `Ok(())` when its input is exhausted or when the token is
//! cancelled; returning an error fails the whole run.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::engine::queue::{QueueReader, QueueWriter};
use crate::errors::StageError;

/// One input, one output transform.
#[async_trait]
pub trait Decorator: Send + Sync {
    async fn decorate(
        &self,
        cancel: CancellationToken,
        input: QueueReader,
        output: QueueWriter,
    ) -> Result<(), StageError>;

    fn name(&self) -> &'static str;
}

/// Many inputs merged into one output.
#[async_trait]
pub trait Multiplexer: Send + Sync {
    async fn multiplex(
        &self,
        cancel: CancellationToken,
        inputs: Vec<QueueReader>,
        output: QueueWriter,
    ) -> Result<(), StageError>;

    fn name(&self) -> &'static str;
}

/// One input distributed over many outputs.
#[async_trait]
pub trait Separator: Send + Sync {
    async fn separate(
        &self,
        cancel: CancellationToken,
        input: QueueReader,
        outputs: Vec<QueueWriter>,
    ) -> Result<(), StageError>;

    fn name(&self) -> &'static str;
}
