//! Deferred-error aggregation for failures that must not abort the run.
//!
//! Staging groups under the exit-at-end policy, tag creation, and a failed
//! tag-push recovery all record here and the pipeline keeps going. The
//! aggregator is consumed exactly once at the end of the run.

use anyhow::{Result, bail};
use tracing::error;

/// A recorded failure: which operation, and what went wrong.
#[derive(Debug)]
pub struct DeferredError {
    pub operation: String,
    pub error: anyhow::Error,
}

/// Append-only list of deferred errors, resolved once at pipeline end.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    deferred: Vec<DeferredError>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, operation: impl Into<String>, error: anyhow::Error) {
        self.deferred.push(DeferredError {
            operation: operation.into(),
            error,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.deferred.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deferred.len()
    }

    /// Consume the aggregator: ok when empty, the single error when one was
    /// recorded, a combined failure after surfacing each one when several.
    pub fn resolve(self) -> Result<()> {
        let mut deferred = self.deferred;
        match deferred.len() {
            0 => Ok(()),
            1 => {
                let single = deferred.remove(0);
                Err(single.error.context(single.operation))
            }
            count => {
                for deferred in &deferred {
                    error!(
                        operation = %deferred.operation,
                        err = %format!("{:#}", deferred.error),
                        "deferred error"
                    );
                }
                bail!("{count} runtime errors occurred during the run");
            }
        }
    }
}
