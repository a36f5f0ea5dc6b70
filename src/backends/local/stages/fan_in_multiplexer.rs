// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::engine::queue::{QueueReader, QueueWriter};
use crate::errors::StageError;
use crate::traits::Multiplexer;

/// Values containing this marker are dropped by the multiplexer.
pub const NO_MULTIPLEXER_MARKER: &str = "no multiplexer";

/// Fan-in Multiplexer - merges every input into one output.
///
/// One reader task per input forwards into an internal merge channel, so
/// values interleave in arrival order across inputs while each input keeps
/// its own order. Values containing [`NO_MULTIPLEXER_MARKER`] are dropped.
/// The stage returns once every input is closed and drained, or on
/// cancellation.
pub struct FanInMultiplexer;

impl FanInMultiplexer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FanInMultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Multiplexer for FanInMultiplexer {
    async fn multiplex(
        &self,
        cancel: CancellationToken,
        inputs: Vec<QueueReader>,
        output: QueueWriter,
    ) -> Result<(), StageError> {
        let (merged_tx, mut merged_rx) = mpsc::channel::<String>(inputs.len().max(1));

        // Dropping the set aborts any reader still running when we return.
        let mut readers = JoinSet::new();
        for input in inputs {
            let merged_tx = merged_tx.clone();
            let cancel = cancel.clone();
            readers.spawn(async move {
                while let Some(value) = input.recv_until(&cancel).await {
                    if merged_tx.send(value).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(merged_tx);

        loop {
            let value = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                value = merged_rx.recv() => match value {
                    Some(value) => value,
                    None => break,
                },
            };

            if value.contains(NO_MULTIPLEXER_MARKER) {
                continue;
            }

            if !output.send_until(&cancel, value).await? {
                break;
            }
        }

        readers.shutdown().await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fan_in_multiplexer"
    }
}
