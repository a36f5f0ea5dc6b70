// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registered stage descriptors.
//!
//! Pure data: each spec names the queues a stage reads and writes plus the
//! stage function. Nothing here validates the graph, so cycles, disconnected
//! stages and queues shared between several stages are all accepted.

use std::sync::Arc;

use crate::traits::{Decorator, Multiplexer, Separator};

#[derive(Clone)]
pub struct DecoratorSpec {
    pub stage: Arc<dyn Decorator>,
    pub input: String,
    pub output: String,
}

#[derive(Clone)]
pub struct MultiplexerSpec {
    pub stage: Arc<dyn Multiplexer>,
    pub inputs: Vec<String>,
    pub output: String,
}

#[derive(Clone)]
pub struct SeparatorSpec {
    pub stage: Arc<dyn Separator>,
    pub input: String,
    pub outputs: Vec<String>,
}

impl DecoratorSpec {
    pub fn queue_names(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.input).chain(std::iter::once(&self.output))
    }
}

impl MultiplexerSpec {
    pub fn queue_names(&self) -> impl Iterator<Item = &String> {
        self.inputs.iter().chain(std::iter::once(&self.output))
    }
}

impl SeparatorSpec {
    pub fn queue_names(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.input).chain(self.outputs.iter())
    }
}

/// The three parallel spec lists, in registration order.
#[derive(Clone, Default)]
pub struct StageSpecs {
    pub decorators: Vec<DecoratorSpec>,
    pub multiplexers: Vec<MultiplexerSpec>,
    pub separators: Vec<SeparatorSpec>,
}

impl StageSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_decorator(&mut self, spec: DecoratorSpec) {
        self.decorators.push(spec);
    }

    pub fn push_multiplexer(&mut self, spec: MultiplexerSpec) {
        self.multiplexers.push(spec);
    }

    pub fn push_separator(&mut self, spec: SeparatorSpec) {
        self.separators.push(spec);
    }

    /// Total number of registered stages of every kind.
    pub fn len(&self) -> usize {
        self.decorators.len() + self.multiplexers.len() + self.separators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every queue name referenced by any stage, duplicates included.
    pub fn queue_names(&self) -> impl Iterator<Item = &String> {
        self.decorators
            .iter()
            .flat_map(|spec| spec.queue_names())
            .chain(self.multiplexers.iter().flat_map(|spec| spec.queue_names()))
            .chain(self.separators.iter().flat_map(|spec| spec.queue_names()))
    }
}

impl std::fmt::Debug for StageSpecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSpecs")
            .field("decorators", &self.decorators.len())
            .field("multiplexers", &self.multiplexers.len())
            .field("separators", &self.separators.len())
            .finish()
    }
}
