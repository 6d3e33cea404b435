//! Boundary markers
//!
//! Every synced shadow root starts with two empty text nodes. Everything
//! between them is injected global style content; everything after the end
//! marker belongs to the component.

use std::collections::HashMap;

use stylable_dom::{DomTree, NodeId};

use crate::error::SyncError;

/// Start/end marker pair of one shadow root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub start: NodeId,
    pub end: NodeId,
}

impl Anchors {
    /// Both markers are still children of `scope`, start before end
    pub(crate) fn is_intact(&self, tree: &DomTree, scope: NodeId) -> bool {
        if tree.parent(self.start) != Some(scope) || tree.parent(self.end) != Some(scope) {
            return false;
        }
        let mut cursor = tree.next_sibling(self.start);
        while let Some(id) = cursor {
            if id == self.end {
                return true;
            }
            cursor = tree.next_sibling(id);
        }
        false
    }
}

/// Marker pairs keyed by shadow root
///
/// Entries outlive detach/reattach cycles so a reattached component reuses
/// its markers instead of stacking new ones; `forget` drops an entry for
/// good.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    by_scope: HashMap<NodeId, Anchors>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers of `scope`, prepending a fresh pair on first use.
    ///
    /// A pair that was moved or removed by someone else is discarded and
    /// replaced.
    pub fn anchors_for(&mut self, tree: &mut DomTree, scope: NodeId) -> Result<Anchors, SyncError> {
        let is_scope = tree
            .get(scope)
            .ok_or(SyncError::NotAScope(scope))?
            .is_shadow_root();
        if !is_scope {
            return Err(SyncError::NotAScope(scope));
        }

        if let Some(anchors) = self.by_scope.get(&scope).copied() {
            if anchors.is_intact(tree, scope) {
                return Ok(anchors);
            }
            tracing::warn!("Boundary markers of {} were disturbed, recreating", scope);
            discard_markers(tree, anchors, scope)?;
        }

        let start = tree.create_text("");
        let end = tree.create_text("");
        tree.prepend_child(scope, end)?;
        tree.prepend_child(scope, start)?;

        let anchors = Anchors { start, end };
        self.by_scope.insert(scope, anchors);
        tracing::trace!("Created boundary markers for {}", scope);
        Ok(anchors)
    }

    /// Existing markers of `scope`, without creating any
    pub fn get(&self, scope: NodeId) -> Option<Anchors> {
        self.by_scope.get(&scope).copied()
    }

    /// Remove the markers of `scope` from the tree together with everything
    /// injected between them, and drop the entry. Returns whether `scope`
    /// had markers.
    pub fn forget(&mut self, tree: &mut DomTree, scope: NodeId) -> Result<bool, SyncError> {
        let Some(anchors) = self.by_scope.remove(&scope) else {
            return Ok(false);
        };

        if anchors.is_intact(tree, scope) {
            let mut cursor = Some(anchors.start);
            while let Some(id) = cursor {
                cursor = tree.next_sibling(id);
                tree.remove(id)?;
                tree.release(id)?;
                if id == anchors.end {
                    break;
                }
            }
        } else {
            discard_markers(tree, anchors, scope)?;
        }
        tracing::trace!("Forgot boundary markers of {}", scope);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.by_scope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }
}

/// Detach markers still under `scope` and release every marker left
/// detached. A marker moved elsewhere is left alone.
fn discard_markers(tree: &mut DomTree, anchors: Anchors, scope: NodeId) -> Result<(), SyncError> {
    for marker in [anchors.start, anchors.end] {
        if tree.parent(marker) == Some(scope) {
            tree.remove(marker)?;
        }
        if tree.get(marker).is_some() && tree.parent(marker).is_none() {
            tree.release(marker)?;
        }
    }
    Ok(())
}
