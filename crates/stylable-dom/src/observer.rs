//! Mutation Observers
//!
//! Observers are registered on the tree and accumulate records for every
//! mutation that matches one of their observations. Delivery is pull-based:
//! whoever drives the event loop takes the records at a microtask checkpoint.

use crate::NodeId;

/// Handle to an observer registered with a `DomTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

/// Mutation record
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

impl MutationRecord {
    pub(crate) fn child_list(
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        previous_sibling: NodeId,
        next_sibling: NodeId,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            previous_sibling: previous_sibling.option(),
            next_sibling: next_sibling.option(),
            attribute_name: None,
            old_value: None,
        }
    }

    pub(crate) fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_ascii_lowercase()),
            old_value,
        }
    }

    pub(crate) fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            old_value: Some(old_value),
        }
    }
}

/// Mutation observer
#[derive(Debug, Default)]
pub struct MutationObserver {
    observed: Vec<(NodeId, MutationObserverInit)>,
    records: Vec<MutationRecord>,
}

impl MutationObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `target`; observing the same node again replaces its options
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) {
        if let Some(entry) = self.observed.iter_mut().find(|(id, _)| *id == target) {
            entry.1 = options;
        } else {
            self.observed.push((target, options));
        }
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.records.clear();
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn is_observing(&self) -> bool {
        !self.observed.is_empty()
    }

    /// Queue `record` if any observation covers it. `ancestors` lists the
    /// inclusive ancestors of the record's target, nearest first.
    pub(crate) fn offer(&mut self, record: &MutationRecord, ancestors: &[NodeId]) {
        let interested = self.observed.iter().find(|(target, options)| {
            let in_scope = *target == record.target
                || (options.subtree && ancestors.contains(target));
            in_scope && Self::wants(options, record)
        });

        let Some((_, options)) = interested else {
            return;
        };

        let mut record = record.clone();
        let keep_old = match record.mutation_type {
            MutationType::Attributes => options.attribute_old_value,
            MutationType::CharacterData => options.character_data_old_value,
            MutationType::ChildList => false,
        };
        if !keep_old {
            record.old_value = None;
        }
        self.records.push(record);
    }

    fn wants(options: &MutationObserverInit, record: &MutationRecord) -> bool {
        match record.mutation_type {
            MutationType::ChildList => options.child_list,
            MutationType::CharacterData => options.character_data,
            MutationType::Attributes => {
                if !options.attributes {
                    return false;
                }
                match (&options.attribute_filter, &record.attribute_name) {
                    (Some(filter), Some(name)) => filter.iter().any(|f| f.eq_ignore_ascii_case(name)),
                    _ => true,
                }
            }
        }
    }
}
