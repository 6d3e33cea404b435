//! Event Loop
//!
//! Single-threaded microtask queue. Work that must wait until the current
//! synchronous callback sequence finishes is queued here and run, in FIFO
//! order, at the next microtask checkpoint.

use std::collections::VecDeque;

/// Handle of a queued microtask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Microtask queue carrying payloads of type `T`
#[derive(Debug)]
pub struct EventLoop<T> {
    /// Microtask queue (Promise callbacks, queueMicrotask)
    microtasks: VecDeque<(TaskId, T)>,
    /// Next task ID
    next_id: u64,
}

impl<T> Default for EventLoop<T> {
    fn default() -> Self {
        Self {
            microtasks: VecDeque::new(),
            next_id: 0,
        }
    }
}

impl<T> EventLoop<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a microtask
    pub fn queue_microtask(&mut self, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.microtasks.push_back((id, task));
        id
    }

    /// Dequeue the oldest microtask
    pub fn pop_microtask(&mut self) -> Option<(TaskId, T)> {
        self.microtasks.pop_front()
    }

    /// Whether `id` is still waiting to run
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.microtasks.iter().any(|(queued, _)| *queued == id)
    }

    pub fn len(&self) -> usize {
        self.microtasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.microtasks.is_empty()
    }
}
