// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::engine::queue::{QueueReader, QueueWriter};
use crate::errors::StageError;
use crate::traits::Separator;

/// Round-Robin Separator - routes the n-th value (0-indexed) to
/// `outputs[n % outputs.len()]`.
pub struct RoundRobinSeparator;

impl RoundRobinSeparator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RoundRobinSeparator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Separator for RoundRobinSeparator {
    async fn separate(
        &self,
        cancel: CancellationToken,
        input: QueueReader,
        outputs: Vec<QueueWriter>,
    ) -> Result<(), StageError> {
        if outputs.is_empty() {
            return Err(anyhow::anyhow!("round robin separator has no outputs").into());
        }

        let mut routed = 0usize;
        while let Some(value) = input.recv_until(&cancel).await {
            let target = &outputs[routed % outputs.len()];
            if !target.send_until(&cancel, value).await? {
                break;
            }
            routed += 1;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "round_robin_separator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::queue::Queue;
    use std::sync::Arc;

    async fn drain(queue: &Queue) -> Vec<String> {
        let mut values = Vec::new();
        while let Some(value) = queue.recv().await {
            values.push(value);
        }
        values
    }

    #[tokio::test]
    async fn test_values_rotate_over_outputs() {
        let input = Arc::new(Queue::new("in", 8));
        let outputs: Vec<Arc<Queue>> = (0..3)
            .map(|i| Arc::new(Queue::new(format!("out{}", i), 8)))
            .collect();
        for i in 0..7 {
            input.send(format!("v{}", i)).await.unwrap();
        }
        input.close().await;

        RoundRobinSeparator::new()
            .separate(
                CancellationToken::new(),
                QueueReader::new(input),
                outputs.iter().cloned().map(QueueWriter::new).collect(),
            )
            .await
            .unwrap();

        for queue in &outputs {
            queue.close().await;
        }
        assert_eq!(drain(&outputs[0]).await, vec!["v0", "v3", "v6"]);
        assert_eq!(drain(&outputs[1]).await, vec!["v1", "v4"]);
        assert_eq!(drain(&outputs[2]).await, vec!["v2", "v5"]);
    }

    #[tokio::test]
    async fn test_no_outputs_is_an_error() {
        let input = Arc::new(Queue::new("in", 1));
        let result = RoundRobinSeparator::new()
            .separate(CancellationToken::new(), QueueReader::new(input), vec![])
            .await;
        assert!(matches!(result, Err(StageError::Other(_))));
    }
}
