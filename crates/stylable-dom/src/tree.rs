//! DOM Tree (arena-based allocation)

use crate::node::{Node, NodeData};
use crate::observer::{MutationObserver, MutationObserverInit, MutationRecord, ObserverId};
use crate::operations::{DomError, DomResult};
use crate::shadow::{self, ShadowError, ShadowRoot, ShadowRootInit};
use crate::NodeId;

/// Arena-based DOM tree
///
/// A removed node stays addressable and can be re-inserted until it is
/// explicitly released; released slots are recycled by later creations.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    observers: Vec<MutationObserver>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::document())],
            free: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())?.as_ref()
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())?.as_mut()
    }

    pub(crate) fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NodeNotFound(id))
    }

    /// Number of live nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of arena slots, live or free
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Some(node);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Free a detached node together with its descendants and any shadow
    /// tree they host. Their ids become dangling and are handed out again
    /// by later creations. Returns the number of released nodes.
    pub fn release(&mut self, id: NodeId) -> DomResult<usize> {
        let node = self.node(id)?;
        if node.parent.is_valid() || id == NodeId::ROOT || node.is_shadow_root() {
            return Err(DomError::HierarchyRequest { parent: node.parent, child: id });
        }

        let mut stack = vec![id];
        let mut released = 0;
        while let Some(current) = stack.pop() {
            stack.extend(self.child_ids(current));
            if let Some(root) = self.get(current).and_then(Node::as_element).and_then(|e| e.shadow_root) {
                stack.push(root);
            }
            if let Some(slot) = self.nodes.get_mut(current.index()) {
                if slot.take().is_some() {
                    self.free.push(current);
                    released += 1;
                }
            }
        }
        tracing::trace!("Released {} nodes rooted at {}", released, id);
        Ok(released)
    }

    // --- Node creation (detached) ---

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }


    // --- Navigation ---

    /// Iterate the direct children of `parent` in order
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next: first }
    }

    /// Direct children as a vector, safe to hold across mutations
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.option())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.option())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.option())
    }

    /// Descendants of `root` in document (pre-)order, excluding `root`.
    /// Shadow trees are not entered.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(root);
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let start = stack.len();
            stack.extend(self.children(id).map(|(child, _)| child));
            stack[start..].reverse();
        }
        out
    }

    /// Inclusive ancestors of `id`, nearest first. Stops at the tree root
    /// or at a shadow root (its host is not an ancestor).
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = id;
        while let Some(node) = self.get(current) {
            out.push(current);
            current = node.parent;
        }
        out
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while let Some(n) = self.get(current) {
            if current == ancestor {
                return true;
            }
            current = n.parent;
        }
        false
    }

    /// Whether `id` is reachable from the document, crossing shadow
    /// boundaries through their hosts
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.get(current) else {
                return false;
            };
            if current == NodeId::ROOT {
                return true;
            }
            current = match (&node.data, node.parent.is_valid()) {
                (_, true) => node.parent,
                (NodeData::ShadowRoot(root), false) => root.host,
                _ => return false,
            };
        }
    }

    // --- Element and text accessors ---

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.name.as_str())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id) {
            Some(node) if node.is_text() => node.as_text().unwrap_or_default().to_string(),
            Some(_) => self.descendants(id)
                .into_iter()
                .filter_map(|d| self.get(d).and_then(Node::as_text))
                .collect(),
            None => String::new(),
        }
    }

    // --- Shadow DOM ---

    /// Attach a shadow root to `host`
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> DomResult<NodeId> {
        let element = self.node(host)?.as_element().ok_or(DomError::NotAnElement(host))?;
        if element.shadow_root.is_some() {
            return Err(ShadowError::AlreadyAttached.into());
        }
        if !shadow::can_attach_shadow(&element.name) {
            return Err(ShadowError::NotSupported.into());
        }

        let root = self.alloc(Node::shadow_root(ShadowRoot::from_init(host, init)));
        if let Some(element) = self.node_mut(host)?.as_element_mut() {
            element.shadow_root = Some(root);
        }
        tracing::trace!("Attached {:?} shadow root {} to {}", init.mode, root, host);
        Ok(root)
    }

    /// The host's shadow root, if one is attached and open
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.get(host)?.as_element()?.shadow_root?;
        self.get(root)?
            .as_shadow_root()
            .filter(|r| r.is_open())
            .map(|_| root)
    }

    /// Host of a shadow root node
    pub fn shadow_host(&self, root: NodeId) -> Option<NodeId> {
        self.get(root)?.as_shadow_root().map(|r| r.host)
    }

    // --- Mutation observers ---

    /// Register a new observer with no observations
    pub fn register_observer(&mut self) -> ObserverId {
        self.observers.push(MutationObserver::new());
        ObserverId(self.observers.len() as u32 - 1)
    }

    /// Start observing `target` with `options`
    pub fn observe(&mut self, observer: ObserverId, target: NodeId, options: MutationObserverInit) {
        if let Some(obs) = self.observers.get_mut(observer.0 as usize) {
            obs.observe(target, options);
        }
    }

    /// Stop all observations and drop queued records
    pub fn disconnect_observer(&mut self, observer: ObserverId) {
        if let Some(obs) = self.observers.get_mut(observer.0 as usize) {
            obs.disconnect();
        }
    }

    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(observer.0 as usize)
            .map(MutationObserver::take_records)
            .unwrap_or_default()
    }

    pub fn has_pending_records(&self, observer: ObserverId) -> bool {
        self.observers
            .get(observer.0 as usize)
            .map(MutationObserver::has_records)
            .unwrap_or(false)
    }

    pub(crate) fn queue_record(&mut self, record: MutationRecord) {
        if !self.observers.iter().any(MutationObserver::is_observing) {
            return;
        }
        let ancestors = self.ancestors(record.target);
        for observer in &mut self.observers {
            observer.offer(&record, &ancestors);
        }
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
