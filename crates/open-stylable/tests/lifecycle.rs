//! Lifecycle tests - the wrapped component's own callbacks

mod common;

use std::panic::{self, AssertUnwindSafe};

use common::*;
use open_stylable::{Component, LifecycleState, MountError, OpenStylable};
use stylable_dom::{Document, DomError, NodeId, ShadowRootInit};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CallbackFailed;

impl std::fmt::Display for CallbackFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "callback failed")
    }
}

#[derive(Default)]
struct Calls {
    connected: u32,
    disconnected: u32,
}

struct Recording {
    host: NodeId,
    calls: Calls,
    fail: bool,
}

impl Recording {
    fn new(doc: &mut Document, fail: bool) -> Self {
        let host = doc.tree.create_element("x-callbacks");
        doc.tree.attach_shadow(host, ShadowRootInit::open()).unwrap();
        Self { host, calls: Calls::default(), fail }
    }
}

impl Component for Recording {
    type Error = CallbackFailed;

    fn host(&self) -> NodeId {
        self.host
    }

    fn connected_callback(&mut self, _doc: &mut Document) -> Result<(), CallbackFailed> {
        self.calls.connected += 1;
        if self.fail { Err(CallbackFailed) } else { Ok(()) }
    }

    fn disconnected_callback(&mut self, _doc: &mut Document) -> Result<(), CallbackFailed> {
        self.calls.disconnected += 1;
        if self.fail { Err(CallbackFailed) } else { Ok(()) }
    }
}

#[test]
fn test_calls_connected_and_disconnected() {
    let (mut doc, mut runtime) = setup();
    let mut element = OpenStylable::new(Recording::new(&mut doc, false));
    let body = doc.body();

    element.mount(&mut doc, &mut runtime, body).unwrap();
    element.unmount(&mut doc, &mut runtime).unwrap();

    assert_eq!(element.inner().calls.connected, 1);
    assert_eq!(element.inner().calls.disconnected, 1);
}

#[test]
fn test_failing_callbacks_still_sync() {
    let (mut doc, mut runtime) = setup();
    doc.add_style("div { color: red }").unwrap();
    runtime.perform_microtask_checkpoint(&mut doc);
    let mut element = OpenStylable::new(Recording::new(&mut doc, true));
    let body = doc.body();

    let err = element.mount(&mut doc, &mut runtime, body).unwrap_err();
    assert!(matches!(err, MountError::Callback(CallbackFailed)));
    assert_eq!(element.inner().calls.connected, 1);
    assert_eq!(element.state(&runtime), LifecycleState::Synced);
    assert_eq!(runtime.injected_nodes(&doc, element.host()).len(), 1);

    let err = element.unmount(&mut doc, &mut runtime).unwrap_err();
    assert_eq!(err.to_string(), "Component lifecycle callback failed: callback failed");
    assert_eq!(element.inner().calls.disconnected, 1);
    assert!(runtime.injected_nodes(&doc, element.host()).is_empty());
}

#[test]
fn test_panic_in_disconnected_still_clears() {
    struct Exploding(NodeId);

    impl Component for Exploding {
        type Error = DomError;

        fn host(&self) -> NodeId {
            self.0
        }

        fn disconnected_callback(&mut self, _doc: &mut Document) -> Result<(), DomError> {
            panic!("disconnected exploded");
        }
    }

    let (mut doc, mut runtime) = setup();
    doc.add_style("div { color: red }").unwrap();
    runtime.perform_microtask_checkpoint(&mut doc);
    let host = doc.tree.create_element("x-exploding");
    doc.tree.attach_shadow(host, ShadowRootInit::open()).unwrap();
    let mut element = OpenStylable::new(Exploding(host));
    let body = doc.body();
    element.mount(&mut doc, &mut runtime, body).unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| element.unmount(&mut doc, &mut runtime)));

    assert!(result.is_err());
    assert!(!runtime.is_tracked(host));
    assert!(runtime.injected_nodes(&doc, host).is_empty());
}

#[test]
fn test_mount_into_own_subtree_fails() {
    let (mut doc, mut runtime) = setup();
    let mut element = OpenStylable::new(Recording::new(&mut doc, false));

    let host = element.host();
    let err = element.mount(&mut doc, &mut runtime, host).unwrap_err();

    assert!(matches!(err, MountError::Dom(_)));
    assert_eq!(element.inner().calls.connected, 0);
    assert!(!runtime.is_tracked(host));
}

#[test]
fn test_into_inner_returns_component() {
    let (mut doc, _runtime) = setup();
    let element = OpenStylable::new(Recording::new(&mut doc, false));
    let host = element.host();

    let inner = element.into_inner();
    assert_eq!(inner.host(), host);
}
