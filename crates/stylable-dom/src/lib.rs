//! Stylable DOM - Document Object Model
//!
//! Arena-based DOM tree with the pieces a style propagation layer needs:
//! open/closed shadow roots, slot recycling for released subtrees, and
//! mutation observers that batch records until they are taken.

mod node;
mod tree;
mod operations;
mod document;
pub mod shadow;
pub mod observer;

pub use node::{Node, NodeData, ElementData, TextData, Attribute};
pub use tree::{DomTree, Children};
pub use operations::{DomError, DomResult};
pub use document::Document;
pub use shadow::{ShadowRoot, ShadowRootInit, ShadowRootMode, ShadowError};
pub use observer::{
    MutationObserver, MutationObserverInit, MutationRecord, MutationType, ObserverId,
};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" in sibling/parent links
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
