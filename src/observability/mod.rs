// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the conveyor. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the text and structured forms
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - conveyor run lifecycle and shutdown events
//! * `messages::stage` - per-stage task lifecycle events
//! * `messages::queue` - queue creation, lookup and closure events
//!
//! # Usage
//!
//! ```rust
//! use the_conveyor::observability::messages::stage::StageTaskStarted;
//! use the_conveyor::observability::messages::StructuredLog;
//!
//! StageTaskStarted {
//!     stage: "prefix_decorator",
//!     kind: "decorator",
//!     inputs: 1,
//!     outputs: 1,
//! }
//! .log();
//! ```

pub mod messages;
