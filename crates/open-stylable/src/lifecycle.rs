//! Lifecycle integration
//!
//! `Component` is what a custom element implements; `OpenStylable` wraps
//! one and hooks global style propagation into its connected and
//! disconnected callbacks. The component's own callback always runs first
//! and its outcome, error or panic included, is handed back unchanged after
//! the style bookkeeping has run.

use std::panic::{self, AssertUnwindSafe};

use stylable_dom::{Document, NodeId};

use crate::error::MountError;
use crate::runtime::{LifecycleState, StyleRuntime};

/// A custom element with a host node and lifecycle callbacks
pub trait Component {
    type Error;

    /// The host element
    fn host(&self) -> NodeId;

    /// Called after the host was inserted into the document
    fn connected_callback(&mut self, _doc: &mut Document) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after the host was removed from the document
    fn disconnected_callback(&mut self, _doc: &mut Document) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A component that receives the document's global styles in its open
/// shadow root
#[derive(Debug)]
pub struct OpenStylable<C> {
    inner: C,
}

impl<C: Component> OpenStylable<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    pub fn host(&self) -> NodeId {
        self.inner.host()
    }

    /// Style propagation state of this component
    pub fn state(&self, runtime: &StyleRuntime) -> LifecycleState {
        runtime.state(self.host())
    }

    /// Run the component's connected callback, then start tracking it
    pub fn connected(&mut self, doc: &mut Document, runtime: &mut StyleRuntime) -> Result<(), C::Error> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.inner.connected_callback(doc)));
        runtime.connect(doc, self.inner.host());
        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Run the component's disconnected callback, then stop tracking it
    pub fn disconnected(&mut self, doc: &mut Document, runtime: &mut StyleRuntime) -> Result<(), C::Error> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.inner.disconnected_callback(doc)));
        runtime.disconnect(doc, self.inner.host());
        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Append the host to `parent` and run the connected callback
    pub fn mount(
        &mut self,
        doc: &mut Document,
        runtime: &mut StyleRuntime,
        parent: NodeId,
    ) -> Result<(), MountError<C::Error>> {
        doc.tree.append_child(parent, self.host())?;
        self.connected(doc, runtime).map_err(MountError::Callback)
    }

    /// Remove the host from its parent and run the disconnected callback
    pub fn unmount(&mut self, doc: &mut Document, runtime: &mut StyleRuntime) -> Result<(), MountError<C::Error>> {
        doc.tree.remove(self.host())?;
        self.disconnected(doc, runtime).map_err(MountError::Callback)
    }
}
