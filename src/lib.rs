// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // reference stage implementations
pub mod config;        // config loading + runtime builder
pub mod engine;        // queues, registry, conveyor orchestration
pub mod errors;        // error handling
pub mod observability;
pub mod traits;        // stage function shapes
