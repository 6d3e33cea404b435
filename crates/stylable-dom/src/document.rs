//! Document - High-level document API

use crate::{DomResult, DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an `html`/`head`/`body` skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Append `<style>` with `css` to the head, returning the element
    pub fn add_style(&mut self, css: &str) -> DomResult<NodeId> {
        let style = self.tree.create_element("style");
        self.tree.set_text_content(style, css)?;
        self.tree.append_child(self.head_element, style)
    }

    /// Append `<link rel="stylesheet" href=...>` to the head
    pub fn add_stylesheet_link(&mut self, href: &str) -> DomResult<NodeId> {
        let link = self.tree.create_element("link");
        self.tree.set_attribute(link, "rel", "stylesheet")?;
        self.tree.set_attribute(link, "href", href)?;
        self.tree.append_child(self.head_element, link)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
