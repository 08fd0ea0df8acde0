//! Errors raised while dispatching a validated request.

use thiserror::Error;

use crate::engine::EngineError;
use crate::whitelist::Action;

/// Failures between validation and a marshalled result.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// A validated argument could not be decoded into the engine's types.
    #[error("invalid argument for {action}: {message}")]
    InvalidArgument {
        /// Action being dispatched.
        action: Action,
        /// What was wrong with the argument.
        message: String,
    },

    /// The engine call failed.
    #[error("{action}: {source}")]
    Engine {
        /// Action being dispatched.
        action: Action,
        /// Engine failure.
        #[source]
        source: EngineError,
    },

    /// The engine result could not be turned into a response payload.
    #[error("{action}: engine output is not UTF-8 text")]
    UndecodableOutput {
        /// Action whose result was being marshalled.
        action: Action,
    },
}

impl DispatchError {
    pub(crate) fn invalid_argument(action: Action, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            action,
            message: message.into(),
        }
    }
}
