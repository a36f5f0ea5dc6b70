// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human readable line and
//! [`StructuredLog`] to emit the same event with typed fields at the level
//! documented on the type.

use tracing::Span;

pub mod engine;
pub mod queue;
pub mod stage;

/// Emit a message as a structured `tracing` event, or open a span carrying
/// the message's fields.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
