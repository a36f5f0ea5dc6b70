// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod client;
pub mod conveyor;
pub mod queue;
pub mod registry;
pub mod specs;
#[cfg(test)]
pub mod integration_tests;

pub use client::ConveyorClient;
pub use conveyor::Conveyor;
pub use queue::{Queue, QueueReader, QueueWriter};
pub use registry::QueueRegistry;
pub use specs::{DecoratorSpec, MultiplexerSpec, SeparatorSpec, StageSpecs};
