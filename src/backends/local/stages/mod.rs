// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod fan_in_multiplexer;
pub mod prefix_decorator;
pub mod round_robin_separator;

pub use fan_in_multiplexer::*;
pub use prefix_decorator::*;
pub use round_robin_separator::*;
