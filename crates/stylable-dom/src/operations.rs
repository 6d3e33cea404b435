//! DOM Node Operations
//!
//! Core node manipulation: appendChild, insertBefore, removeChild, plus
//! attribute and character data edits. Every mutation of a connected
//! or disconnected tree is reported to the registered observers.

use crate::node::NodeData;
use crate::observer::MutationRecord;
use crate::shadow::ShadowError;
use crate::{DomTree, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Reference node is not a child of the parent
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Operation requires an element
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
    #[error(transparent)]
    Shadow(#[from] ShadowError),
}

impl DomTree {
    /// Append `child` as the last child of `parent`, moving it if it is
    /// already in the tree
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let first = self.first_child(parent);
        self.insert_before(parent, child, first)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let parent_node = self.node(parent)?;
        if matches!(parent_node.data, NodeData::Text(_)) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.node(child)?;
        if matches!(child_node.data, NodeData::Document | NodeData::ShadowRoot(_))
            || self.is_inclusive_ancestor(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: reference });
            }
        }
        if reference == Some(child) {
            // Inserting a node before itself leaves it where it is
            return Ok(child);
        }

        if self.parent(child).is_some() {
            self.remove(child)?;
        }

        let next = reference.unwrap_or(NodeId::NONE);
        let prev = match reference {
            Some(r) => self.node(r)?.prev_sibling,
            None => self.node(parent)?.last_child,
        };

        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = child;
        } else {
            self.node_mut(parent)?.first_child = child;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = child;
        } else {
            self.node_mut(parent)?.last_child = child;
        }

        self.queue_record(MutationRecord::child_list(parent, vec![child], Vec::new(), prev, next));
        Ok(child)
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.remove(child)?;
        Ok(child)
    }

    /// Detach `id` from its parent; a no-op for nodes already detached
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.node_mut(prev)?.next_sibling = next;
        } else {
            self.node_mut(parent)?.first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next)?.prev_sibling = prev;
        } else {
            self.node_mut(parent)?.last_child = prev;
        }
        {
            let node = self.node_mut(id)?;
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }

        self.queue_record(MutationRecord::child_list(parent, Vec::new(), vec![id], prev, next));
        Ok(())
    }

    /// Remove every child of `parent`
    pub fn remove_all_children(&mut self, parent: NodeId) -> DomResult<()> {
        for child in self.child_ids(parent) {
            self.remove(child)?;
        }
        Ok(())
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let element = self.node_mut(id)?.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        let old = element.set_attr(name, value);
        self.queue_record(MutationRecord::attribute(id, name, old));
        Ok(())
    }

    /// Replace the data of a text node
    pub fn set_data(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        let old = match &mut self.node_mut(id)?.data {
            NodeData::Text(text) => std::mem::replace(&mut text.content, content.to_string()),
            _ => return Err(DomError::HierarchyRequest { parent: id, child: NodeId::NONE }),
        };
        self.queue_record(MutationRecord::character_data(id, old));
        Ok(())
    }

    /// `textContent` setter: text nodes get their data replaced, other nodes
    /// lose all children and gain a single text child (none for "")
    pub fn set_text_content(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        if matches!(self.node(id)?.data, NodeData::Text(_)) {
            return self.set_data(id, content);
        }
        self.remove_all_children(id)?;
        if !content.is_empty() {
            let text = self.create_text(content);
            self.append_child(id, text)?;
        }
        Ok(())
    }
}
