//! Comprehensive tests for stylable-dom
//!
//! Tree structure, shadow roots and observer delivery through the public API.

use stylable_dom::{
    Document, DomTree, MutationObserverInit, MutationType, NodeId, ShadowRootInit,
};

#[test]
fn test_dom_tree_creation() {
    let mut tree = DomTree::new();

    // Create a simple structure: div > span > text
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    let text = tree.create_text("Hello, World!");

    tree.append_child(tree.root(), div).unwrap();
    tree.append_child(div, span).unwrap();
    tree.append_child(span, text).unwrap();

    assert_eq!(tree.len(), 4); // root + div + span + text

    let div_node = tree.get(div).unwrap();
    assert_eq!(div_node.parent, tree.root());
    assert_eq!(div_node.first_child, span);

    let span_node = tree.get(span).unwrap();
    assert_eq!(span_node.parent, div);
    assert_eq!(span_node.first_child, text);

    assert_eq!(tree.text_content(div), "Hello, World!");
}

#[test]
fn test_tree_empty_operations() {
    let tree = DomTree::new();

    assert!(tree.get(NodeId::NONE).is_none());
    assert_eq!(tree.children(NodeId::NONE).count(), 0);
    assert!(tree.descendants(NodeId::NONE).is_empty());
}

#[test]
fn test_remove_is_idempotent() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.append_child(tree.root(), div).unwrap();

    tree.remove(div).unwrap();
    tree.remove(div).unwrap();
    assert_eq!(tree.children(tree.root()).count(), 0);
    assert!(!tree.is_connected(div));
}

#[test]
fn test_document_skeleton() {
    let doc = Document::new();
    let html = doc.document_element();

    assert_eq!(doc.tree.parent(html), Some(doc.tree.root()));
    assert_eq!(doc.tree.child_ids(html), vec![doc.head(), doc.body()]);
    assert_eq!(doc.tree.tag_name(doc.head()), Some("head"));
}

#[test]
fn test_document_style_helpers() {
    let mut doc = Document::default();
    let style = doc.add_style("div { color: red }").unwrap();
    let link = doc.add_stylesheet_link("theme.css").unwrap();

    assert_eq!(doc.tree.child_ids(doc.head()), vec![style, link]);
    assert_eq!(doc.tree.get_attribute(link, "rel"), Some("stylesheet"));
    assert_eq!(doc.tree.tag_name(style), Some("style"));
}

#[test]
fn test_shadow_content_is_encapsulated() {
    let mut doc = Document::default();
    let host = doc.tree.create_element("x-basic");
    let root = doc.tree.attach_shadow(host, ShadowRootInit::open()).unwrap();
    let div = doc.tree.create_element("div");
    doc.tree.append_child(root, div).unwrap();
    doc.tree.append_child(doc.body(), host).unwrap();

    assert!(doc.tree.is_connected(div));
    assert!(!doc.tree.descendants(doc.tree.root()).contains(&div));
    assert_eq!(doc.tree.descendants(root), vec![div]);
}

#[test]
fn test_observer_sees_head_changes_only() {
    let mut doc = Document::default();
    let observer = doc.tree.register_observer();
    doc.tree.observe(observer, doc.head(), MutationObserverInit {
        child_list: true,
        attributes: true,
        character_data: true,
        subtree: true,
        ..Default::default()
    });

    let div = doc.tree.create_element("div");
    doc.tree.append_child(doc.body(), div).unwrap();
    assert!(!doc.tree.has_pending_records(observer));

    let style = doc.add_style("p{}").unwrap();
    doc.tree.set_text_content(style, "p{margin:0}").unwrap();
    doc.tree.remove(style).unwrap();

    let kinds: Vec<MutationType> = doc.tree
        .take_records(observer)
        .iter()
        .map(|r| r.mutation_type)
        .collect();
    // append, text swap (remove + add), removal from head
    assert_eq!(kinds, vec![MutationType::ChildList; 4]);

    doc.tree.disconnect_observer(observer);
    doc.add_style("a{}").unwrap();
    assert!(!doc.tree.has_pending_records(observer));
}

#[test]
fn test_released_detached_subtree_frees_slots() {
    let mut doc = Document::default();
    let style = doc.add_style("div { color: red }").unwrap();
    let live = doc.tree.len();

    doc.tree.remove(style).unwrap();
    assert_eq!(doc.tree.release(style).unwrap(), 2);
    assert_eq!(doc.tree.len(), live - 2);

    // The freed slots are taken before the arena grows
    let slots = doc.tree.allocated();
    doc.add_style("div { color: blue }").unwrap();
    assert_eq!(doc.tree.allocated(), slots);
    assert_eq!(doc.tree.len(), live);
}

#[test]
fn test_deep_nesting() {
    let mut tree = DomTree::new();
    let mut parent = tree.root();
    for _ in 0..1000 {
        let child = tree.create_element("div");
        tree.append_child(parent, child).unwrap();
        parent = child;
    }

    assert_eq!(tree.descendants(tree.root()).len(), 1000);
    assert_eq!(tree.ancestors(parent).len(), 1001);
}
