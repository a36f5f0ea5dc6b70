// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod conveyor;
mod queue;
mod stage;

pub use config::{ConfigError, ValidationError};
pub use conveyor::ConveyorError;
pub use queue::QueueError;
pub use stage::StageError;
