//! Shared fixtures for the integration tests

#![allow(dead_code)]

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use open_stylable::{Component, Config, OpenStylable, StyleRuntime};
use stylable_dom::{Document, DomError, DomResult, NodeId, ShadowRootInit};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once; `RUST_LOG` controls the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn setup() -> (Document, StyleRuntime) {
    init_tracing();
    let mut doc = Document::default();
    let runtime = StyleRuntime::new(&mut doc, Config::default());
    (doc, runtime)
}

/// Value of the last `property` declaration in `css`, printed by lightningcss
pub fn last_declaration(css: &str, property: &str) -> Option<String> {
    let sheet = StyleSheet::parse(css, ParserOptions::default()).ok()?;
    let mut value = None;
    for rule in &sheet.rules.0 {
        if let CssRule::Style(style) = rule {
            for decl in &style.declarations.declarations {
                if decl.property_id().name() == property {
                    value = decl.value_to_css_string(PrinterOptions::default()).ok();
                }
            }
        }
    }
    value
}

/// What `property` resolves to inside `host`'s shadow root: the last
/// declaration across its `<style>` children in tree order. Every test
/// stylesheet targets `div`, so selectors are not matched.
pub fn resolved(doc: &Document, host: NodeId, property: &str) -> Option<String> {
    let scope = doc.tree.shadow_root(host)?;
    let mut value = None;
    for (id, node) in doc.tree.children(scope) {
        let is_style = node.as_element().is_some_and(|e| e.name == "style");
        if !is_style {
            continue;
        }
        if let Some(v) = last_declaration(&doc.tree.text_content(id), property) {
            value = Some(v);
        }
    }
    value
}

/// `color` value of `css` as the resolver would print it
pub fn color(css_value: &str) -> Option<String> {
    last_declaration(&format!("div {{ color: {} }}", css_value), "color")
}

/// Element children of `host`'s shadow root, markers excluded
pub fn shadow_elements(doc: &Document, host: NodeId) -> Vec<NodeId> {
    let Some(scope) = doc.tree.shadow_root(host) else {
        return Vec::new();
    };
    doc.tree
        .children(scope)
        .filter(|(_, node)| node.is_element())
        .map(|(id, _)| id)
        .collect()
}

fn render_hello(doc: &mut Document, host: NodeId) -> DomResult<NodeId> {
    let scope = doc.tree.attach_shadow(host, ShadowRootInit::open())?;
    let div = doc.tree.create_element("div");
    doc.tree.set_text_content(div, "hello")?;
    doc.tree.append_child(scope, div)?;
    Ok(scope)
}

/// Attaches its shadow root on construction
pub struct Basic {
    host: NodeId,
}

impl Basic {
    pub fn new(doc: &mut Document) -> DomResult<Self> {
        let host = doc.tree.create_element("x-basic");
        render_hello(doc, host)?;
        Ok(Self { host })
    }
}

impl Component for Basic {
    type Error = DomError;

    fn host(&self) -> NodeId {
        self.host
    }
}

/// Attaches its shadow root in its connected callback
pub struct Framework {
    host: NodeId,
}

impl Framework {
    pub fn new(doc: &mut Document) -> Self {
        Self { host: doc.tree.create_element("x-framework") }
    }
}

impl Component for Framework {
    type Error = DomError;

    fn host(&self) -> NodeId {
        self.host
    }

    fn connected_callback(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if doc.tree.shadow_root(self.host).is_none() {
            render_hello(doc, self.host)?;
        }
        Ok(())
    }
}

/// Has its own `<style>` ahead of its content
pub struct OwnStyles {
    host: NodeId,
}

impl OwnStyles {
    pub fn new(doc: &mut Document, css: &str) -> DomResult<Self> {
        let host = doc.tree.create_element("x-ownstyles");
        let scope = doc.tree.attach_shadow(host, ShadowRootInit::open())?;
        let style = doc.tree.create_element("style");
        doc.tree.set_text_content(style, css)?;
        doc.tree.append_child(scope, style)?;
        let div = doc.tree.create_element("div");
        doc.tree.append_child(scope, div)?;
        Ok(Self { host })
    }
}

impl Component for OwnStyles {
    type Error = DomError;

    fn host(&self) -> NodeId {
        self.host
    }
}

pub fn mount_basic(doc: &mut Document, runtime: &mut StyleRuntime) -> OpenStylable<Basic> {
    let mut element = OpenStylable::new(Basic::new(doc).unwrap());
    let body = doc.body();
    element.mount(doc, runtime, body).unwrap();
    element
}
