//! Error types

use stylable_dom::{DomError, NodeId};

/// Failures while injecting or clearing styles in a shadow root
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The host has no open shadow root (yet)
    #[error("Host {0} has no open shadow root")]
    MissingScope(NodeId),
    /// The node handed in as a scope is not a shadow root
    #[error("Node {0} is not a shadow root")]
    NotAScope(NodeId),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Failure of `OpenStylable::mount`/`unmount`
#[derive(Debug, thiserror::Error)]
pub enum MountError<E> {
    /// Inserting or removing the host element failed; no callback ran
    #[error(transparent)]
    Dom(#[from] DomError),
    /// The component's own lifecycle callback failed
    #[error("Component lifecycle callback failed: {0}")]
    Callback(E),
}
