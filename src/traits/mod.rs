// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod stage;

pub use stage::{Decorator, Multiplexer, Separator};
