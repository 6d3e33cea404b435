//! Sync Engine
//!
//! Clear-then-apply of the injected region between a scope's markers.

use stylable_dom::{DomTree, NodeId};

use crate::anchors::Anchors;
use crate::cache::StyleSourceCache;
use crate::error::SyncError;
use crate::tracker::GlobalStyleSnapshot;

/// Stateless clear/apply operations on one injected region
pub struct SyncEngine;

impl SyncEngine {
    /// Nodes currently between the markers, in order. Empty when the end
    /// marker no longer follows the start marker.
    pub fn injected(tree: &DomTree, anchors: Anchors) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut cursor = tree.next_sibling(anchors.start);
        while let Some(id) = cursor {
            if id == anchors.end {
                return nodes;
            }
            nodes.push(id);
            cursor = tree.next_sibling(id);
        }
        Vec::new()
    }

    /// Remove everything between the markers and release it back to the
    /// tree. Returns the number of removed nodes.
    pub fn clear(tree: &mut DomTree, anchors: Anchors) -> Result<usize, SyncError> {
        let injected = Self::injected(tree, anchors);
        for &node in &injected {
            tree.remove(node)?;
            tree.release(node)?;
        }
        Ok(injected.len())
    }

    /// Insert one node per snapshot source, in snapshot order, right before
    /// the end marker. Returns the number of inserted nodes.
    pub fn apply(
        tree: &mut DomTree,
        anchors: Anchors,
        snapshot: &GlobalStyleSnapshot,
        cache: &mut StyleSourceCache,
    ) -> Result<usize, SyncError> {
        let mut inserted = 0;
        for source in snapshot.iter() {
            let node = cache.representation_for(source).instantiate(tree)?;
            tree.insert_before(tree_parent(tree, anchors)?, node, Some(anchors.end))?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Make the region mirror `snapshot` exactly
    pub fn sync(
        tree: &mut DomTree,
        anchors: Anchors,
        snapshot: &GlobalStyleSnapshot,
        cache: &mut StyleSourceCache,
    ) -> Result<(), SyncError> {
        let removed = Self::clear(tree, anchors)?;
        let inserted = Self::apply(tree, anchors, snapshot, cache)?;
        tracing::trace!("Synced region before {}: -{} +{}", anchors.end, removed, inserted);
        Ok(())
    }
}

fn tree_parent(tree: &DomTree, anchors: Anchors) -> Result<NodeId, SyncError> {
    tree.parent(anchors.end).ok_or(SyncError::NotAScope(anchors.end))
}
