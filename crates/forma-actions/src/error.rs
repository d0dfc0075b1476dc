//! Action execution error types.

use thiserror::Error;

use crate::context::Capability;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action '{action_type}' requires the {capability} capability, which was not provided")]
    MissingCapability {
        action_type: String,
        capability: Capability,
    },

    #[error("Action '{action_type}' failed: {source}")]
    Failed {
        action_type: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Sequence aborted at step {step}: {source}")]
    SequenceAborted {
        step: usize,
        #[source]
        source: Box<ActionError>,
    },
}
