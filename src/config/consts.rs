// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Queue capacity used when a config file does not set one
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
