// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::engine::queue::{QueueReader, QueueWriter};
use crate::errors::StageError;
use crate::traits::Decorator;

/// Prefix applied by [`PrefixDecorator::new`].
pub const DECORATED_PREFIX: &str = "decorated: ";

/// Values containing this marker make the decorator fail the run.
pub const NO_DECORATOR_MARKER: &str = "no decorator";

/// Prefix Decorator - prepends a prefix to every value that lacks it.
///
/// A value containing [`NO_DECORATOR_MARKER`] stops the stage with
/// [`StageError::CannotDecorate`]; nothing after it is read.
pub struct PrefixDecorator {
    prefix: String,
}

impl PrefixDecorator {
    pub fn new() -> Self {
        Self::with_prefix(DECORATED_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Decorate a single value. Already-prefixed values come back unchanged.
    pub fn apply(&self, value: String) -> Result<String, StageError> {
        if value.contains(NO_DECORATOR_MARKER) {
            return Err(StageError::CannotDecorate(value));
        }

        if value.starts_with(&self.prefix) {
            Ok(value)
        } else {
            Ok(format!("{}{}", self.prefix, value))
        }
    }
}

impl Default for PrefixDecorator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Decorator for PrefixDecorator {
    async fn decorate(
        &self,
        cancel: CancellationToken,
        input: QueueReader,
        output: QueueWriter,
    ) -> Result<(), StageError> {
        while let Some(value) = input.recv_until(&cancel).await {
            let decorated = self.apply(value)?;
            if !output.send_until(&cancel, decorated).await? {
                break;
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "prefix_decorator"
    }
}
