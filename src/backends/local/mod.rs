// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process reference stages and the factory that builds them by name.

pub mod factory;
pub mod stages;

pub use factory::LocalStageFactory;
pub use stages::*;
