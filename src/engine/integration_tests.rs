// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::backends::local::{FanInMultiplexer, PrefixDecorator, RoundRobinSeparator};
use crate::engine::{Conveyor, ConveyorClient};
use crate::errors::{ConveyorError, QueueError, StageError};

/// Integration tests for the conveyor using the reference stages
#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn start(conveyor: Conveyor) -> (ConveyorClient, CancellationToken, JoinHandle<Result<(), ConveyorError>>) {
        let client = conveyor.client();
        let cancel = CancellationToken::new();
        let run = tokio::spawn(conveyor.run(cancel.clone()));
        (client, cancel, run)
    }

    async fn recv(client: &ConveyorClient, queue: &str) -> Option<String> {
        timeout(WAIT, client.recv(queue))
            .await
            .expect("timed out waiting for a value")
            .expect("queue should exist")
    }

    #[tokio::test]
    async fn test_decorator_end_to_end() {
        let mut conveyor = Conveyor::new(4);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        client.send("a", "x").await.unwrap();
        assert_eq!(recv(&client, "b").await.as_deref(), Some("decorated: x"));

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_decorator_then_separator_end_to_end() {
        let mut conveyor = Conveyor::new(4);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap()
            .register_separator(Arc::new(RoundRobinSeparator::new()), "b", strings(&["c", "d"]))
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        for value in ["p1", "p2", "p3"] {
            client.send("a", value).await.unwrap();
        }

        assert_eq!(recv(&client, "c").await.as_deref(), Some("decorated: p1"));
        assert_eq!(recv(&client, "c").await.as_deref(), Some("decorated: p3"));
        assert_eq!(recv(&client, "d").await.as_deref(), Some("decorated: p2"));

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_fifo_order_through_a_stage() {
        let mut conveyor = Conveyor::new(16);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "in", "out")
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        let expected: Vec<String> = (0..50).map(|i| format!("decorated: {}", i)).collect();
        let producer = {
            let client = client.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    client.send("in", i.to_string()).await.unwrap();
                }
            })
        };

        let mut received = Vec::new();
        for _ in 0..50 {
            received.push(recv(&client, "out").await.unwrap());
        }
        producer.await.unwrap();
        assert_eq!(received, expected);

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_already_decorated_value_passes_unchanged() {
        let mut conveyor = Conveyor::new(2);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        client.send("a", "decorated: y").await.unwrap();
        assert_eq!(recv(&client, "b").await.as_deref(), Some("decorated: y"));

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_decorator_failure_fails_the_run() {
        let mut conveyor = Conveyor::new(4);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap()
            .register_separator(Arc::new(RoundRobinSeparator::new()), "b", strings(&["c", "d"]))
            .unwrap();
        let (client, _cancel, run) = start(conveyor);

        client.send("a", "ok").await.unwrap();
        client.send("a", "no decorator").await.unwrap();
        // Either still buffered when shutdown drains, or rejected as closed.
        let _ = client.send("a", "after").await;

        let err = timeout(WAIT, run).await.unwrap().unwrap().unwrap_err();
        assert!(err.to_string().starts_with("conveyor error:"));
        assert!(matches!(
            err.stage_error(),
            Some(StageError::CannotDecorate(value)) if value == "no decorator"
        ));

        // The failing value never reached the output, and nothing after it did.
        let mut downstream = Vec::new();
        for queue in ["b", "c", "d"] {
            while let Some(value) = client.recv(queue).await.unwrap() {
                downstream.push(value);
            }
        }
        assert_eq!(downstream, vec!["decorated: ok"]);
        assert_eq!(client.send("a", "late").await, Err(QueueError::Closed("a".to_string())));
    }

    #[tokio::test]
    async fn test_round_robin_positions_over_three_outputs() {
        let mut conveyor = Conveyor::new(16);
        conveyor
            .register_separator(Arc::new(RoundRobinSeparator::new()), "in", strings(&["o0", "o1", "o2"]))
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        for i in 0..10 {
            client.send("in", format!("v{}", i)).await.unwrap();
        }

        for (k, queue) in ["o0", "o1", "o2"].iter().enumerate() {
            let expected: Vec<String> = (0..10).filter(|i| i % 3 == k).map(|i| format!("v{}", i)).collect();
            let mut got = Vec::new();
            for _ in 0..expected.len() {
                got.push(recv(&client, queue).await.unwrap());
            }
            assert_eq!(got, expected, "output {} got the wrong positions", queue);
        }

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_multiplexer_filters_marked_values() {
        let mut conveyor = Conveyor::new(8);
        conveyor
            .register_multiplexer(Arc::new(FanInMultiplexer::new()), strings(&["m1", "m2"]), "merged")
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        client.send("m1", "one").await.unwrap();
        client.send("m2", "no multiplexer").await.unwrap();
        client.send("m2", "two").await.unwrap();
        client.send("m1", "three").await.unwrap();

        let mut merged = Vec::new();
        for _ in 0..3 {
            merged.push(recv(&client, "merged").await.unwrap());
        }
        merged.sort();
        assert_eq!(merged, vec!["one", "three", "two"]);

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
        assert_eq!(client.recv("merged").await, Ok(None), "the filtered value never shows up");
    }

    #[tokio::test]
    async fn test_unknown_queue_has_no_side_effect() {
        let mut conveyor = Conveyor::new(2);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        assert_eq!(client.send("zzz", "v").await, Err(QueueError::NotFound("zzz".to_string())));
        assert_eq!(client.recv("zzz").await, Err(QueueError::NotFound("zzz".to_string())));
        assert!(!client.has_queue("zzz"));
        assert_eq!(client.queue_names(), vec!["a", "b"]);

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_cyclic_graph_runs_until_cancelled() {
        let mut conveyor = Conveyor::new(4);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap()
            .register_separator(Arc::new(RoundRobinSeparator::new()), "b", strings(&["a", "tap"]))
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        client.send("a", "loop").await.unwrap();
        // Second pass through the decorator leaves the value unchanged.
        assert_eq!(recv(&client, "tap").await.as_deref(), Some("decorated: loop"));

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_mixed_graph_of_all_three_kinds() {
        let mut conveyor = Conveyor::new(8);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "left_in", "left")
            .unwrap()
            .register_decorator(Arc::new(PrefixDecorator::with_prefix("right: ")), "right_in", "right")
            .unwrap()
            .register_multiplexer(Arc::new(FanInMultiplexer::new()), strings(&["left", "right"]), "merged")
            .unwrap()
            .register_separator(Arc::new(RoundRobinSeparator::new()), "merged", strings(&["even", "odd"]))
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        client.send("left_in", "l").await.unwrap();
        client.send("right_in", "r").await.unwrap();

        let mut outputs = vec![recv(&client, "even").await.unwrap(), recv(&client, "odd").await.unwrap()];
        outputs.sort();
        assert_eq!(outputs, vec!["decorated: l", "right: r"]);

        cancel.cancel();
        timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_cancel_unblocks_stage_waiting_on_full_output() {
        let mut conveyor = Conveyor::new(1);
        conveyor
            .register_decorator(Arc::new(PrefixDecorator::new()), "a", "b")
            .unwrap();
        let (client, cancel, run) = start(conveyor);

        // "b" holds one value, the stage holds the next while waiting for
        // room, and "a" holds the last. Nobody drains "b".
        for value in ["one", "two", "three"] {
            timeout(WAIT, client.send("a", value)).await.unwrap().unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        cancel.cancel();
        let result = timeout(WAIT, run).await.expect("run stalled on a full output");
        assert!(result.unwrap().is_ok());
        assert_eq!(client.recv("b").await.unwrap().as_deref(), Some("decorated: one"));
    }
}
