//! Style Source Cache
//!
//! One shared, ready-to-apply representation per style source, so a head
//! with N sources and M components costs N derivations instead of N * M.
//!
//! Entries are keyed by source identity and remember the content they were
//! derived from. A source edited in place (same node, new text or
//! attributes) no longer matches its entry and is re-derived on the next
//! lookup; entries for sources that left the snapshot are pruned by
//! `retain`.

use std::collections::HashMap;
use std::rc::Rc;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use stylable_dom::{Attribute, DomResult, DomTree, NodeId};

use crate::tracker::{GlobalStyleSnapshot, SourceContent, SourceKind, StyleSource};

/// Applied form of a style source, shared between all shadow roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRepresentation {
    kind: SourceKind,
    attrs: Vec<Attribute>,
    css: String,
}

impl StyleRepresentation {
    fn derive(content: &SourceContent, normalize: bool) -> Self {
        let css = match content.kind {
            SourceKind::Inline if normalize => match normalize_css(&content.text) {
                Ok(css) => css,
                Err(message) => {
                    tracing::debug!("Keeping unparsable inline style verbatim: {}", message);
                    content.text.clone()
                }
            },
            _ => content.text.clone(),
        };
        Self {
            kind: content.kind,
            attrs: content.attrs.clone(),
            css,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Stylesheet text (normalized for inline sources, empty for links)
    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Build a detached node carrying this representation
    pub fn instantiate(&self, tree: &mut DomTree) -> DomResult<NodeId> {
        let tag = match self.kind {
            SourceKind::Inline => "style",
            SourceKind::Linked => "link",
        };
        let node = tree.create_element(tag);
        for attr in &self.attrs {
            tree.set_attribute(node, &attr.name, &attr.value)?;
        }
        if self.kind == SourceKind::Inline && !self.css.is_empty() {
            let text = tree.create_text(&self.css);
            tree.append_child(node, text)?;
        }
        Ok(node)
    }
}

/// Parse and re-print a stylesheet in minified form
fn normalize_css(text: &str) -> Result<String, String> {
    let sheet = StyleSheet::parse(text, ParserOptions::default()).map_err(|e| e.to_string())?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(printed.code)
}

#[derive(Debug)]
struct CacheEntry {
    content: SourceContent,
    representation: Rc<StyleRepresentation>,
}

/// Cache of derived style representations keyed by source node
#[derive(Debug)]
pub struct StyleSourceCache {
    entries: HashMap<NodeId, CacheEntry>,
    normalize: bool,
    hits: u64,
    misses: u64,
}

impl Default for StyleSourceCache {
    fn default() -> Self {
        Self::new(false)
    }
}

impl StyleSourceCache {
    /// Create an empty cache; `normalize` minifies inline CSS on derivation
    pub fn new(normalize: bool) -> Self {
        Self {
            entries: HashMap::new(),
            normalize,
            hits: 0,
            misses: 0,
        }
    }

    /// Shared representation of `source`, derived on first request or when
    /// the source's content changed since the cached derivation
    pub fn representation_for(&mut self, source: &StyleSource) -> Rc<StyleRepresentation> {
        if let Some(entry) = self.entries.get(&source.node) {
            if entry.content == source.content {
                self.hits += 1;
                return Rc::clone(&entry.representation);
            }
            tracing::debug!("Style source {} changed in place, re-deriving", source.node);
        }

        self.misses += 1;
        let representation = Rc::new(StyleRepresentation::derive(&source.content, self.normalize));
        self.entries.insert(source.node, CacheEntry {
            content: source.content.clone(),
            representation: Rc::clone(&representation),
        });
        representation
    }

    /// Drop entries for sources that are no longer in `snapshot`
    pub fn retain(&mut self, snapshot: &GlobalStyleSnapshot) {
        let before = self.entries.len();
        self.entries.retain(|node, _| snapshot.contains(*node));
        let pruned = before - self.entries.len();
        if pruned > 0 {
            tracing::trace!("Pruned {} stale style representations", pruned);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if self.hits + self.misses > 0 {
                self.hits as f64 / (self.hits + self.misses) as f64
            } else {
                0.0
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}
