// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::client::ConveyorClient;
use crate::engine::registry::QueueRegistry;
use crate::engine::specs::{DecoratorSpec, MultiplexerSpec, SeparatorSpec, StageSpecs};
use crate::errors::{ConveyorError, QueueError, StageError};
use crate::observability::messages::engine::{
    CancellationTriggered, RunCompleted, RunFailed, RunStarted, ShutdownCompleted,
};
use crate::observability::messages::stage::{
    StageTaskFailed, StageTaskFinished, StageTaskPanicked, StageTaskStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Decorator, Multiplexer, Separator};

type StageFuture = Pin<Box<dyn Future<Output = Result<(), StageError>> + Send>>;

/// Conveyor of named, bounded queues wired together by stage functions.
///
/// A `Conveyor` is a builder: stages are registered through `&mut self`, and
/// [`Conveyor::run`] consumes it, so registration can never race execution
/// and a conveyor can only run once.
///
/// Queues are created when the stage naming them is registered. That makes
/// `send`/`recv` between registration and `run` behave the same as during the
/// run.
///
/// The stage graph is not validated. Cycles are legal and keep data flowing
/// until the run is cancelled; a queue may be the output of one stage and the
/// input of several others.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use the_conveyor::backends::local::PrefixDecorator;
/// use the_conveyor::engine::Conveyor;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut conveyor = Conveyor::new(4);
/// conveyor.register_decorator(Arc::new(PrefixDecorator::new()), "in", "out").unwrap();
///
/// let client = conveyor.client();
/// let cancel = CancellationToken::new();
/// let run = tokio::spawn(conveyor.run(cancel.clone()));
///
/// client.send("in", "x").await.unwrap();
/// assert_eq!(client.recv("out").await.unwrap().as_deref(), Some("decorated: x"));
///
/// cancel.cancel();
/// run.await.unwrap().unwrap();
/// # }
/// ```
pub struct Conveyor {
    queues: Arc<QueueRegistry>,
    specs: StageSpecs,
}

impl Conveyor {
    /// Create a conveyor whose queues all hold up to `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Arc::new(QueueRegistry::new(capacity)),
            specs: StageSpecs::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.queues.capacity()
    }

    pub fn stage_count(&self) -> usize {
        self.specs.len()
    }

    pub fn queue_names(&self) -> Vec<String> {
        self.queues.names()
    }

    /// A client for external producers and consumers. It outlives `run`.
    pub fn client(&self) -> ConveyorClient {
        ConveyorClient::new(self.queues.clone())
    }

    /// Register a one-input, one-output stage.
    ///
    /// Never fails; it returns `Result` so all three registrations chain the
    /// same way with `?`.
    pub fn register_decorator(
        &mut self,
        stage: Arc<dyn Decorator>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Result<&mut Self, ConveyorError> {
        let spec = DecoratorSpec {
            stage,
            input: input.into(),
            output: output.into(),
        };
        self.ensure_queues(spec.queue_names());
        self.specs.push_decorator(spec);
        Ok(self)
    }

    pub fn register_multiplexer(
        &mut self,
        stage: Arc<dyn Multiplexer>,
        inputs: Vec<String>,
        output: impl Into<String>,
    ) -> Result<&mut Self, ConveyorError> {
        if inputs.is_empty() {
            return Err(ConveyorError::InvalidStage {
                stage: stage.name().to_string(),
                reason: "a multiplexer needs at least one input queue".to_string(),
            });
        }

        let spec = MultiplexerSpec {
            stage,
            inputs,
            output: output.into(),
        };
        self.ensure_queues(spec.queue_names());
        self.specs.push_multiplexer(spec);
        Ok(self)
    }

    pub fn register_separator(
        &mut self,
        stage: Arc<dyn Separator>,
        input: impl Into<String>,
        outputs: Vec<String>,
    ) -> Result<&mut Self, ConveyorError> {
        if outputs.is_empty() {
            return Err(ConveyorError::InvalidStage {
                stage: stage.name().to_string(),
                reason: "a separator needs at least one output queue".to_string(),
            });
        }

        let spec = SeparatorSpec {
            stage,
            input: input.into(),
            outputs,
        };
        self.ensure_queues(spec.queue_names());
        self.specs.push_separator(spec);
        Ok(self)
    }

    /// See [`ConveyorClient::send`].
    pub async fn send(&self, queue: &str, value: impl Into<String>) -> Result<(), QueueError> {
        self.client().send(queue, value).await
    }

    /// See [`ConveyorClient::recv`].
    pub async fn recv(&self, queue: &str) -> Result<Option<String>, QueueError> {
        self.client().recv(queue).await
    }

    /// Run every registered stage concurrently, then close all queues.
    ///
    /// All stages share one cancellation signal, a child of `cancel`. The
    /// signal fires when the caller cancels `cancel` or when the first stage
    /// fails. `run` returns only after every stage task has finished:
    ///
    /// * `Ok(())` if no stage failed (the run was cancelled, or every stage
    ///   ran out of input).
    /// * The first observed failure, wrapped in [`ConveyorError::StageFailed`]
    ///   or [`ConveyorError::StagePanicked`], otherwise.
    ///
    /// Shutdown is sequenced: queues are closed only after the last stage task
    /// has returned, and closing wakes any external `send` still waiting for
    /// room so it fails instead of writing into a dead queue.
    ///
    /// Dropping the returned future before it completes cancels all stages
    /// and closes every queue in the background, so clients see
    /// [`QueueError::Closed`] just as after a normal return.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), ConveyorError> {
        let Conveyor { queues, specs } = self;
        let start_time = Instant::now();

        // Idempotent; registration already created every one of these.
        for name in specs.queue_names() {
            queues.ensure(name);
        }

        RunStarted {
            stage_count: specs.len(),
            queue_count: queues.len(),
        }
        .log();

        // Wire everything before spawning anything so a lookup failure leaves
        // no stage running.
        let token = cancel.child_token();
        let launches = wire_stages(&specs, &queues, &token)?;

        let abandon_guard = AbandonGuard::new(token.clone(), queues.clone());
        let failure = FirstFailure::default();
        let tasks: Vec<(String, JoinHandle<()>)> = launches
            .into_iter()
            .map(|launch| spawn_stage(launch, token.clone(), failure.clone()))
            .collect();

        // Panics are caught inside each task; a join error here means the task
        // was aborted by the runtime shutting down.
        for (label, handle) in tasks {
            if handle.await.is_err() {
                failure.record(ConveyorError::StagePanicked { stage: label });
                token.cancel();
            }
        }
        abandon_guard.disarm();

        let queues_closed = queues.close_all().await;
        ShutdownCompleted { queues_closed }.log();

        let duration = start_time.elapsed();
        match failure.take() {
            Some(error) => {
                RunFailed {
                    stage: error.stage().unwrap_or("unknown"),
                    error: &error,
                    duration,
                }
                .log();
                Err(error)
            }
            None => {
                RunCompleted {
                    stage_count: specs.len(),
                    duration,
                }
                .log();
                Ok(())
            }
        }
    }

    fn ensure_queues<'a>(&self, names: impl Iterator<Item = &'a String>) {
        for name in names {
            self.queues.ensure(name);
        }
    }
}

impl std::fmt::Debug for Conveyor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conveyor")
            .field("queues", &self.queues)
            .field("specs", &self.specs)
            .finish()
    }
}

/// A stage resolved to its queue handles, ready to spawn.
struct StageLaunch {
    label: String,
    kind: &'static str,
    inputs: usize,
    outputs: usize,
    future: StageFuture,
}

/// Cancels the stages and closes the queues if `run` is dropped mid-flight.
struct AbandonGuard {
    token: CancellationToken,
    queues: Arc<QueueRegistry>,
    armed: bool,
}

impl AbandonGuard {
    fn new(token: CancellationToken, queues: Arc<QueueRegistry>) -> Self {
        Self {
            token,
            queues,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        CancellationTriggered {
            reason: "conveyor run abandoned",
        }
        .log();
        self.token.cancel();

        let queues = self.queues.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    let queues_closed = queues.close_all().await;
                    ShutdownCompleted { queues_closed }.log();
                });
            }
            Err(_) => tracing::warn!("conveyor run dropped outside a tokio runtime; queues left open"),
        }
    }
}

/// Keeps the first failure recorded by any stage task.
#[derive(Clone, Default)]
struct FirstFailure(Arc<Mutex<Option<ConveyorError>>>);

impl FirstFailure {
    fn record(&self, error: ConveyorError) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    fn take(&self) -> Option<ConveyorError> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Resolve every spec's queues into scoped handles and build its future.
fn wire_stages(
    specs: &StageSpecs,
    queues: &QueueRegistry,
    token: &CancellationToken,
) -> Result<Vec<StageLaunch>, ConveyorError> {
    let mut launches = Vec::with_capacity(specs.len());

    for spec in &specs.decorators {
        let stage = spec.stage.clone();
        let input = queues.reader(&spec.input)?;
        let output = queues.writer(&spec.output)?;
        let cancel = token.clone();
        launches.push(StageLaunch {
            label: stage_label(stage.name(), launches.len()),
            kind: "decorator",
            inputs: 1,
            outputs: 1,
            future: Box::pin(async move { stage.decorate(cancel, input, output).await }),
        });
    }

    for spec in &specs.multiplexers {
        let stage = spec.stage.clone();
        let inputs = spec
            .inputs
            .iter()
            .map(|name| queues.reader(name))
            .collect::<Result<Vec<_>, _>>()?;
        let output = queues.writer(&spec.output)?;
        let cancel = token.clone();
        launches.push(StageLaunch {
            label: stage_label(stage.name(), launches.len()),
            kind: "multiplexer",
            inputs: inputs.len(),
            outputs: 1,
            future: Box::pin(async move { stage.multiplex(cancel, inputs, output).await }),
        });
    }

    for spec in &specs.separators {
        let stage = spec.stage.clone();
        let input = queues.reader(&spec.input)?;
        let outputs = spec
            .outputs
            .iter()
            .map(|name| queues.writer(name))
            .collect::<Result<Vec<_>, _>>()?;
        let cancel = token.clone();
        launches.push(StageLaunch {
            label: stage_label(stage.name(), launches.len()),
            kind: "separator",
            inputs: 1,
            outputs: outputs.len(),
            future: Box::pin(async move { stage.separate(cancel, input, outputs).await }),
        });
    }

    Ok(launches)
}

fn stage_label(name: &str, index: usize) -> String {
    format!("{}#{}", name, index)
}

fn spawn_stage(
    launch: StageLaunch,
    token: CancellationToken,
    failure: FirstFailure,
) -> (String, JoinHandle<()>) {
    let label = launch.label.clone();
    let started = StageTaskStarted {
        stage: &launch.label,
        kind: launch.kind,
        inputs: launch.inputs,
        outputs: launch.outputs,
    };
    let span = started.span("stage_task");
    started.log();

    let StageLaunch { label: stage, future, .. } = launch;
    let handle = tokio::spawn(
        async move {
            let start_time = Instant::now();
            // Cancels siblings however this task ends, including an abort.
            let cancel_on_exit = token.clone().drop_guard();

            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(Ok(())) => {
                    cancel_on_exit.disarm();
                    StageTaskFinished {
                        stage: &stage,
                        cancelled: token.is_cancelled(),
                        duration: start_time.elapsed(),
                    }
                    .log();
                }
                Ok(Err(error)) => {
                    StageTaskFailed {
                        stage: &stage,
                        error: &error,
                    }
                    .log();
                    failure.record(ConveyorError::StageFailed {
                        stage: stage.clone(),
                        source: error,
                    });
                    CancellationTriggered {
                        reason: "stage failed",
                    }
                    .log();
                    drop(cancel_on_exit);
                }
                Err(_panic) => {
                    // Recorded before siblings see the cancellation it causes.
                    StageTaskPanicked { stage: &stage }.log();
                    failure.record(ConveyorError::StagePanicked {
                        stage: stage.clone(),
                    });
                    CancellationTriggered {
                        reason: "stage panicked",
                    }
                    .log();
                    drop(cancel_on_exit);
                }
            }
        }
        .instrument(span),
    );

    (label, handle)
}
