// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::stages::*;
use crate::config::{StageConfig, StageKind};
use crate::errors::ConfigError;
use crate::traits::{Decorator, Multiplexer, Separator};

/// A stage built by the factory, tagged with its shape.
#[derive(Clone)]
pub enum LocalStage {
    Decorator(Arc<dyn Decorator>),
    Multiplexer(Arc<dyn Multiplexer>),
    Separator(Arc<dyn Separator>),
}

impl LocalStage {
    pub fn kind(&self) -> StageKind {
        match self {
            LocalStage::Decorator(_) => StageKind::Decorator,
            LocalStage::Multiplexer(_) => StageKind::Multiplexer,
            LocalStage::Separator(_) => StageKind::Separator,
        }
    }
}

/// Factory for creating local (in-process) stage instances
pub struct LocalStageFactory;

impl LocalStageFactory {
    /// Create a stage instance from configuration
    ///
    /// The `handler` field in the config determines which stage to create, and
    /// the handler must fit the configured `kind`:
    /// - "prefix_decorator" -> PrefixDecorator (decorator)
    /// - "round_robin_separator" -> RoundRobinSeparator (separator)
    /// - "fan_in_multiplexer" -> FanInMultiplexer (multiplexer)
    pub fn create_stage(config: &StageConfig) -> Result<LocalStage, ConfigError> {
        let stage = match (config.kind, config.handler.as_str()) {
            (StageKind::Decorator, "prefix_decorator") => {
                LocalStage::Decorator(Arc::new(PrefixDecorator::new()))
            }
            (StageKind::Separator, "round_robin_separator") => {
                LocalStage::Separator(Arc::new(RoundRobinSeparator::new()))
            }
            (StageKind::Multiplexer, "fan_in_multiplexer") => {
                LocalStage::Multiplexer(Arc::new(FanInMultiplexer::new()))
            }
            _ => {
                return Err(ConfigError::UnknownHandler {
                    stage_id: config.id.clone(),
                    handler: config.handler.clone(),
                })
            }
        };
        Ok(stage)
    }

    /// List all available local stage implementations with their kind
    pub fn list_available_implementations() -> Vec<(&'static str, StageKind)> {
        vec![
            ("prefix_decorator", StageKind::Decorator),
            ("round_robin_separator", StageKind::Separator),
            ("fan_in_multiplexer", StageKind::Multiplexer),
        ]
    }

    /// Check if an implementation is available for the given kind
    pub fn is_implementation_available(handler: &str, kind: StageKind) -> bool {
        Self::list_available_implementations()
            .iter()
            .any(|(name, available_kind)| *name == handler && *available_kind == kind)
    }
}
