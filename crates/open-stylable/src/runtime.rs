//! Style Runtime
//!
//! Owns everything that has to outlive a single component: the tracker
//! watching the style root, the shared representation cache, the marker
//! registry, the tracked-instance side table and the microtask queue for
//! deferred work. One runtime serves one document.

use std::collections::HashMap;

use stylable_dom::{Document, DomTree, MutationObserverInit, NodeId, ObserverId};

use crate::anchors::AnchorRegistry;
use crate::cache::{CacheStats, StyleSourceCache};
use crate::config::Config;
use crate::error::SyncError;
use crate::event_loop::{EventLoop, TaskId};
use crate::sync::SyncEngine;
use crate::tracker::{GlobalStyleSnapshot, GlobalStyleTracker};

/// Where a component stands with respect to global style propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not tracked, nothing injected (never attached, or detached and cleared)
    Unattached,
    /// Attached before its shadow root existed; a sync is queued
    AwaitingDeferredSync,
    /// Attached and mirroring the current global styles
    Synced,
    /// Detached; the clear is queued behind a pending deferred sync
    Detaching,
    /// Attached, but the deferred sync found no open shadow root either.
    /// The next broadcast after a root appears syncs it.
    MissingScope,
}

#[derive(Debug)]
struct TrackedInstance {
    state: LifecycleState,
    pending_sync: Option<TaskId>,
}

#[derive(Debug, Clone, Copy)]
struct PendingClear {
    task: TaskId,
    after_sync: TaskId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Microtask {
    DeferredSync { host: NodeId },
    DeferredClear { host: NodeId },
}

/// Runtime context for propagating head styles into shadow roots
#[derive(Debug)]
pub struct StyleRuntime {
    config: Config,
    observer: ObserverId,
    tracker: GlobalStyleTracker,
    cache: StyleSourceCache,
    anchors: AnchorRegistry,
    instances: HashMap<NodeId, TrackedInstance>,
    pending_clears: HashMap<NodeId, PendingClear>,
    event_loop: EventLoop<Microtask>,
}

impl StyleRuntime {
    /// Start watching the style root of `doc` and take the initial snapshot
    pub fn new(doc: &mut Document, config: Config) -> Self {
        let style_root = config.style_root.unwrap_or_else(|| doc.head());
        let tree = &mut doc.tree;

        let observer = tree.register_observer();
        tree.observe(
            observer,
            style_root,
            MutationObserverInit {
                child_list: true,
                subtree: true,
                attributes: config.observe_attributes,
                character_data: config.observe_character_data,
                ..Default::default()
            },
        );

        let mut tracker = GlobalStyleTracker::new(style_root);
        tracker.refresh(tree);
        tracing::debug!("Style runtime watching {} ({} sources)", style_root, tracker.current().len());

        Self {
            cache: StyleSourceCache::new(config.normalize_inline_styles),
            config,
            observer,
            tracker,
            anchors: AnchorRegistry::new(),
            instances: HashMap::new(),
            pending_clears: HashMap::new(),
            event_loop: EventLoop::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register `host` and sync its shadow root, or defer the sync to the
    /// next microtask checkpoint if the root is not attached yet
    pub fn connect(&mut self, doc: &mut Document, host: NodeId) {
        // A clear still waiting in the queue must not undo this attach
        let reattached = self.pending_clears.remove(&host);
        if reattached.is_some() {
            tracing::debug!("{} re-attached before its deferred clear ran", host);
        }

        if let Some(scope) = doc.tree.shadow_root(host) {
            self.sync_scope_logged(&mut doc.tree, host, scope);
            self.instances.insert(host, TrackedInstance {
                state: LifecycleState::Synced,
                pending_sync: None,
            });
            return;
        }

        // Reuse a deferred sync that is still queued for this host
        let pending = reattached
            .map(|clear| clear.after_sync)
            .or_else(|| self.instances.get(&host).and_then(|i| i.pending_sync))
            .filter(|&task| self.event_loop.is_pending(task));
        let task = match pending {
            Some(task) => task,
            None => self.event_loop.queue_microtask(Microtask::DeferredSync { host }),
        };
        tracing::debug!("{} has no shadow root yet, deferring sync", host);
        self.instances.insert(host, TrackedInstance {
            state: LifecycleState::AwaitingDeferredSync,
            pending_sync: Some(task),
        });
    }

    /// Unregister `host` and clear its injected styles. If a deferred sync
    /// is still pending the clear is queued to run right after it.
    pub fn disconnect(&mut self, doc: &mut Document, host: NodeId) {
        let Some(instance) = self.instances.remove(&host) else {
            tracing::debug!("Ignoring detach of untracked {}", host);
            return;
        };

        match instance.pending_sync.filter(|&task| self.event_loop.is_pending(task)) {
            Some(after_sync) => {
                let task = self.event_loop.queue_microtask(Microtask::DeferredClear { host });
                self.pending_clears.insert(host, PendingClear { task, after_sync });
                tracing::debug!("Queued clear of {} behind its deferred sync", host);
            }
            None => self.clear_logged(&mut doc.tree, host),
        }
    }

    /// Deliver pending style-root mutations and run queued microtasks until
    /// neither is left. Returns the number of microtasks run.
    pub fn perform_microtask_checkpoint(&mut self, doc: &mut Document) -> usize {
        let mut ran = 0;
        loop {
            if doc.tree.has_pending_records(self.observer) {
                let records = doc.tree.take_records(self.observer);
                tracing::debug!("Delivering {} style root mutations", records.len());
                self.refresh_and_broadcast(doc);
                continue;
            }

            let Some((id, task)) = self.event_loop.pop_microtask() else {
                break;
            };
            self.run_microtask(doc, id, task);
            ran += 1;
        }
        ran
    }

    /// Whether a checkpoint would do anything
    pub fn has_pending_work(&self, doc: &Document) -> bool {
        !self.event_loop.is_empty() || doc.tree.has_pending_records(self.observer)
    }

    /// Rescan the style root and re-sync every tracked instance that has a
    /// shadow root
    pub fn refresh_and_broadcast(&mut self, doc: &mut Document) {
        self.tracker.refresh(&doc.tree);
        self.cache.retain(self.tracker.current());

        let mut hosts: Vec<NodeId> = self.instances.keys().copied().collect();
        hosts.sort();
        for host in hosts {
            let Some(scope) = doc.tree.shadow_root(host) else {
                continue;
            };
            self.sync_scope_logged(&mut doc.tree, host, scope);
            if let Some(instance) = self.instances.get_mut(&host) {
                if instance.state == LifecycleState::MissingScope {
                    instance.state = LifecycleState::Synced;
                }
            }
        }
    }

    pub fn is_tracked(&self, host: NodeId) -> bool {
        self.instances.contains_key(&host)
    }

    pub fn state(&self, host: NodeId) -> LifecycleState {
        match self.instances.get(&host) {
            Some(instance) => instance.state,
            None if self.pending_clears.contains_key(&host) => LifecycleState::Detaching,
            None => LifecycleState::Unattached,
        }
    }

    /// Number of tracked instances
    pub fn tracked_count(&self) -> usize {
        self.instances.len()
    }

    /// Global styles as of the last refresh
    pub fn snapshot(&self) -> &GlobalStyleSnapshot {
        self.tracker.current()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Nodes injected into `host`'s shadow root, in order
    pub fn injected_nodes(&self, doc: &Document, host: NodeId) -> Vec<NodeId> {
        doc.tree
            .shadow_root(host)
            .and_then(|scope| self.anchors.get(scope).filter(|a| a.is_intact(&doc.tree, scope)))
            .map(|anchors| SyncEngine::injected(&doc.tree, anchors))
            .unwrap_or_default()
    }

    /// Drop every trace of `host`: tracking, queued clears, injected nodes
    /// and the markers themselves. For components destroyed for good.
    pub fn forget(&mut self, doc: &mut Document, host: NodeId) -> Result<(), SyncError> {
        self.instances.remove(&host);
        self.pending_clears.remove(&host);
        if let Some(scope) = doc.tree.shadow_root(host) {
            self.anchors.forget(&mut doc.tree, scope)?;
        }
        Ok(())
    }

    /// Stop observing the style root. Injected styles stay where they are.
    pub fn shutdown(self, doc: &mut Document) {
        doc.tree.disconnect_observer(self.observer);
        tracing::debug!(
            "Style runtime shut down with {} tracked instances",
            self.instances.len()
        );
    }

    fn run_microtask(&mut self, doc: &mut Document, id: TaskId, task: Microtask) {
        match task {
            Microtask::DeferredSync { host } => self.run_deferred_sync(doc, id, host),
            Microtask::DeferredClear { host } => {
                let current = self.pending_clears.get(&host).map(|clear| clear.task);
                if current != Some(id) {
                    tracing::debug!("Skipping deferred clear of re-attached {}", host);
                    return;
                }
                self.pending_clears.remove(&host);
                self.clear_logged(&mut doc.tree, host);
            }
        }
    }

    /// Runs whether or not `host` is still tracked; a detach in the
    /// meantime queued its clear behind this task.
    fn run_deferred_sync(&mut self, doc: &mut Document, id: TaskId, host: NodeId) {
        let scope = doc.tree.shadow_root(host);
        match scope {
            Some(scope) => self.sync_scope_logged(&mut doc.tree, host, scope),
            None => tracing::debug!("{}", SyncError::MissingScope(host)),
        }

        if let Some(instance) = self.instances.get_mut(&host) {
            if instance.pending_sync == Some(id) {
                instance.pending_sync = None;
                instance.state = match scope {
                    Some(_) => LifecycleState::Synced,
                    None => LifecycleState::MissingScope,
                };
            }
        }
    }

    fn sync_scope(&mut self, tree: &mut DomTree, scope: NodeId) -> Result<(), SyncError> {
        let anchors = self.anchors.anchors_for(tree, scope)?;
        SyncEngine::sync(tree, anchors, self.tracker.current(), &mut self.cache)
    }

    fn sync_scope_logged(&mut self, tree: &mut DomTree, host: NodeId, scope: NodeId) {
        match self.sync_scope(tree, scope) {
            Ok(()) => tracing::trace!("Synced global styles into {}", host),
            Err(e) => tracing::warn!("Failed to sync global styles into {}: {}", host, e),
        }
    }

    fn clear(&mut self, tree: &mut DomTree, host: NodeId) -> Result<usize, SyncError> {
        let Some(scope) = tree.shadow_root(host) else {
            return Ok(0);
        };
        if self.anchors.get(scope).is_none() {
            return Ok(0);
        }
        let anchors = self.anchors.anchors_for(tree, scope)?;
        SyncEngine::clear(tree, anchors)
    }

    fn clear_logged(&mut self, tree: &mut DomTree, host: NodeId) {
        match self.clear(tree, host) {
            Ok(removed) => tracing::trace!("Cleared {} injected nodes from {}", removed, host),
            Err(e) => tracing::warn!("Failed to clear global styles from {}: {}", host, e),
        }
    }
}
