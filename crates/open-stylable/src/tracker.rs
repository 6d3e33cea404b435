//! Global Style Tracker
//!
//! Keeps the ordered list of style sources found under the style root.
//! The list is rebuilt wholesale on every refresh; nothing here is
//! patched incrementally.

use stylable_dom::{Attribute, DomTree, NodeId};

/// What kind of style-bearing node a source is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// `<style>` with inline rules
    Inline,
    /// `<link rel="stylesheet">`
    Linked,
}

/// Everything about a source that its applied form depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    pub kind: SourceKind,
    pub attrs: Vec<Attribute>,
    /// Stylesheet text; empty for links
    pub text: String,
}

/// A style-bearing node under the style root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSource {
    /// Identity of the source node
    pub node: NodeId,
    pub content: SourceContent,
}

impl StyleSource {
    /// Read the source at `id`, if that node is style-bearing
    pub fn read(tree: &DomTree, id: NodeId) -> Option<Self> {
        let element = tree.get(id)?.as_element()?;
        let kind = match element.name.as_str() {
            "style" => SourceKind::Inline,
            "link" if element.has_token("rel", "stylesheet") => SourceKind::Linked,
            _ => return None,
        };
        let text = match kind {
            SourceKind::Inline => tree.text_content(id),
            SourceKind::Linked => String::new(),
        };
        Some(Self {
            node: id,
            content: SourceContent {
                kind,
                attrs: element.attrs.clone(),
                text,
            },
        })
    }
}

/// Ordered style sources at the time of the last refresh
#[derive(Debug, Clone, Default)]
pub struct GlobalStyleSnapshot {
    sources: Vec<StyleSource>,
    generation: u64,
}

impl GlobalStyleSnapshot {
    pub fn iter(&self) -> impl Iterator<Item = &StyleSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of refreshes that produced this snapshot
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.sources.iter().any(|s| s.node == node)
    }
}

/// Tracks the style sources of one style root
#[derive(Debug)]
pub struct GlobalStyleTracker {
    style_root: NodeId,
    snapshot: GlobalStyleSnapshot,
}

impl GlobalStyleTracker {
    pub fn new(style_root: NodeId) -> Self {
        Self {
            style_root,
            snapshot: GlobalStyleSnapshot::default(),
        }
    }

    pub fn style_root(&self) -> NodeId {
        self.style_root
    }

    /// Rescan the style root in document order
    pub fn refresh(&mut self, tree: &DomTree) {
        let sources: Vec<StyleSource> = tree
            .descendants(self.style_root)
            .into_iter()
            .filter_map(|id| StyleSource::read(tree, id))
            .collect();

        self.snapshot = GlobalStyleSnapshot {
            sources,
            generation: self.snapshot.generation + 1,
        };
        tracing::debug!(
            "Refreshed global styles: {} sources (generation {})",
            self.snapshot.len(),
            self.snapshot.generation
        );
    }

    /// Snapshot from the last refresh
    pub fn current(&self) -> &GlobalStyleSnapshot {
        &self.snapshot
    }
}
