//! Observable FIFO queues shared between machines.
//!
//! A queue is owned behind a [`QueueHandle`] so one machine's output queue
//! can be aliased as another machine's input queue; the wiring is handle
//! sharing, never copying. Observation is an explicit publish/subscribe
//! surface on the queue itself: `push` notifies push listeners after the
//! value is appended, `pop` notifies pop listeners after the value is
//! removed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;

/// Shared handle to an [`IoQueue`].
pub type QueueHandle = Rc<RefCell<IoQueue>>;

/// Listener invoked after a queue mutation with the queue and the moved value.
pub type Listener = Box<dyn FnMut(&mut IoQueue, i64)>;

/// FIFO integer queue with explicit mutation observation.
///
/// Listeners receive the queue as an argument rather than capturing its
/// handle; capturing the handle would re-borrow the `RefCell` already
/// borrowed by the running mutation and panic. The list being notified is
/// detached while its listeners run, so a listener that mutates its own
/// queue does not re-enter that list.
#[derive(Default)]
pub struct IoQueue {
    values: VecDeque<i64>,
    on_push: Vec<Listener>,
    on_pop: Vec<Listener>,
}

impl IoQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue holding the given values, front first.
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Wraps the queue in a shared handle.
    pub fn handle(self) -> QueueHandle {
        Rc::new(RefCell::new(self))
    }

    /// Appends `value`, then notifies push listeners.
    pub fn push(&mut self, value: i64) {
        self.values.push_back(value);
        self.notify_push(value);
    }

    /// Removes the front value, then notifies pop listeners.
    ///
    /// Returns `None` without notification when the queue is empty.
    pub fn pop(&mut self) -> Option<i64> {
        let value = self.values.pop_front()?;
        self.notify_pop(value);
        Some(value)
    }

    /// Returns the number of queued values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no values are queued.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the most recently appended value, if any.
    pub fn last(&self) -> Option<i64> {
        self.values.back().copied()
    }

    /// Returns the queued values, front first.
    pub fn to_vec(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }

    /// Registers a listener fired after each append.
    pub fn observe_push(&mut self, listener: impl FnMut(&mut IoQueue, i64) + 'static) {
        self.on_push.push(Box::new(listener));
    }

    /// Registers a listener fired after each removal.
    pub fn observe_pop(&mut self, listener: impl FnMut(&mut IoQueue, i64) + 'static) {
        self.on_pop.push(Box::new(listener));
    }

    fn notify_push(&mut self, value: i64) {
        let mut listeners = mem::take(&mut self.on_push);
        for listener in &mut listeners {
            listener(self, value);
        }
        // Listeners registered while firing were pushed onto the detached
        // slot; keep them behind the original registrations.
        let added = mem::replace(&mut self.on_push, listeners);
        self.on_push.extend(added);
    }

    fn notify_pop(&mut self, value: i64) {
        let mut listeners = mem::take(&mut self.on_pop);
        for listener in &mut listeners {
            listener(self, value);
        }
        let added = mem::replace(&mut self.on_pop, listeners);
        self.on_pop.extend(added);
    }
}
