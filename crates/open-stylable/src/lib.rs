//! open-stylable - Global styles for open shadow roots
//!
//! Shadow encapsulation keeps document-level stylesheets out of component
//! shadow trees. This crate copies the `<style>` and `<link rel="stylesheet">`
//! sources of the document head into every tracked component's open shadow
//! root and keeps those copies in sync as the head changes.
//!
//! Injected styles live between two empty text markers at the very start of
//! each shadow root, so a component's own styles (which come after) still
//! win cascade ties.
//!
//! ```ignore
//! let mut doc = Document::default();
//! let mut runtime = StyleRuntime::new(&mut doc, Config::default());
//! let mut card = OpenStylable::new(Card::new(&mut doc));
//! card.mount(&mut doc, &mut runtime, doc.body())?;
//! doc.add_style("div { color: red }")?;
//! runtime.perform_microtask_checkpoint(&mut doc);
//! ```

mod anchors;
mod cache;
mod config;
mod error;
mod event_loop;
mod lifecycle;
mod runtime;
mod sync;
mod tracker;

pub use anchors::{AnchorRegistry, Anchors};
pub use cache::{CacheStats, StyleRepresentation, StyleSourceCache};
pub use config::Config;
pub use error::{MountError, SyncError};
pub use event_loop::{EventLoop, TaskId};
pub use lifecycle::{Component, OpenStylable};
pub use runtime::{LifecycleState, StyleRuntime};
pub use sync::SyncEngine;
pub use tracker::{GlobalStyleSnapshot, GlobalStyleTracker, SourceContent, SourceKind, StyleSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
