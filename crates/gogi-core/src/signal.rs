//! Node-level signals.
//!
//! A [`SignalBus`] maps `(sender, kind)` channels to receivers. Each receiver
//! holds at most one connection per channel: connecting again replaces the
//! previous slot instead of stacking a second one.
//!
//! The bus is generic over the context `C` that slots receive mutably, so a
//! slot can modify the owner of the bus (typically the viewport) in response
//! to an event. Dispatch clones the slot handles out of the bus first, which
//! lets the owner hand itself to each slot.
//!
//! Events emitted while the owner is batching updates go through the FIFO
//! queue and are drained in order at flush time.
//!
//! # Example
//!
//! ```
//! use gogi_core::signal::{SignalBus, SignalEvent, SignalKind};
//! use gogi_core::tree::Tree;
//!
//! let mut tree = Tree::new();
//! let button = tree.create_node("Button", "ok");
//! let dialog = tree.create_node("Frame", "dialog");
//!
//! let mut bus: SignalBus<Vec<String>> = SignalBus::new();
//! bus.connect(button, SignalKind::Clicked, dialog, |log: &mut Vec<String>, _: &SignalEvent| {
//!     log.push("first".into());
//! });
//! // Reconnecting the same receiver replaces the slot.
//! bus.connect(button, SignalKind::Clicked, dialog, |log: &mut Vec<String>, _: &SignalEvent| {
//!     log.push("second".into());
//! });
//!
//! let mut log = Vec::new();
//! bus.dispatch(&mut log, &SignalEvent::new(SignalKind::Clicked, button));
//! assert_eq!(log, vec!["second".to_string()]);
//! ```

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::tree::NodeId;

const TARGET: &str = "gogi_core::signal";

/// The kind of event a node emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The node was activated by a pointer click. No payload.
    Clicked,
    /// The node became selected. No payload.
    Selected,
    /// The node stopped being selected. No payload.
    Unselected,
    /// The node's value changed. Payload type is defined by the node type.
    ValueChanged,
    /// A tab view switched tabs. Payload: the new tab index as `usize`.
    TabSelected,
    /// A collapsed tab view showed its frames again. No payload.
    TabOpened,
    /// A tab view hid its frames, leaving only the tab row. No payload.
    TabCollapsed,
    /// The root finished a flush that changed something. Payload:
    /// the flush's `UpdateReport`.
    Updated,
    /// Application-defined signal.
    Custom(u32),
}

/// An emitted signal: kind, sender, and an optional opaque payload.
#[derive(Clone)]
pub struct SignalEvent {
    pub kind: SignalKind,
    pub sender: NodeId,
    payload: Option<Rc<dyn Any>>,
}

impl SignalEvent {
    pub fn new(kind: SignalKind, sender: NodeId) -> Self {
        Self {
            kind,
            sender,
            payload: None,
        }
    }

    /// Attach a payload.
    pub fn with_payload<T: Any>(mut self, payload: T) -> Self {
        self.payload = Some(Rc::new(payload));
        self
    }

    /// The payload, if present and of type `T`.
    pub fn payload_as<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }
}

impl fmt::Debug for SignalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEvent")
            .field("kind", &self.kind)
            .field("sender", &self.sender)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

/// A connected callback.
pub type Slot<C> = Rc<dyn Fn(&mut C, &SignalEvent)>;

struct Connection<C> {
    receiver: NodeId,
    slot: Slot<C>,
}

/// Signal connections plus the queue of events awaiting dispatch.
pub struct SignalBus<C> {
    channels: HashMap<(NodeId, SignalKind), Vec<Connection<C>>>,
    queue: VecDeque<SignalEvent>,
}

impl<C> Default for SignalBus<C> {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
            queue: VecDeque::new(),
        }
    }
}

impl<C> SignalBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `receiver` to `sender`'s `kind` channel.
    ///
    /// Returns `true` if an existing connection from the same receiver was
    /// replaced.
    pub fn connect<F>(&mut self, sender: NodeId, kind: SignalKind, receiver: NodeId, slot: F) -> bool
    where
        F: Fn(&mut C, &SignalEvent) + 'static,
    {
        let slot: Slot<C> = Rc::new(slot);
        let connections = self.channels.entry((sender, kind)).or_default();
        match connections.iter_mut().find(|c| c.receiver == receiver) {
            Some(existing) => {
                tracing::trace!(target: TARGET, ?sender, ?kind, ?receiver, "replaced connection");
                existing.slot = slot;
                true
            }
            None => {
                tracing::trace!(target: TARGET, ?sender, ?kind, ?receiver, "connected");
                connections.push(Connection { receiver, slot });
                false
            }
        }
    }

    /// Remove `receiver`'s connection to the channel.
    pub fn disconnect(&mut self, sender: NodeId, kind: SignalKind, receiver: NodeId) -> bool {
        let Some(connections) = self.channels.get_mut(&(sender, kind)) else {
            return false;
        };
        let before = connections.len();
        connections.retain(|c| c.receiver != receiver);
        let removed = connections.len() != before;
        if connections.is_empty() {
            self.channels.remove(&(sender, kind));
        }
        removed
    }

    /// Drop every connection in which `node` is the sender or the receiver,
    /// and any queued events it sent.
    pub fn disconnect_node(&mut self, node: NodeId) {
        self.channels.retain(|(sender, _), connections| {
            if *sender == node {
                return false;
            }
            connections.retain(|c| c.receiver != node);
            !connections.is_empty()
        });
        self.queue.retain(|e| e.sender != node);
    }

    /// Number of receivers connected to a channel.
    pub fn connection_count(&self, sender: NodeId, kind: SignalKind) -> usize {
        self.channels.get(&(sender, kind)).map_or(0, Vec::len)
    }

    /// The slots currently connected to the event's channel, in connection
    /// order.
    pub fn slots_for(&self, event: &SignalEvent) -> Vec<Slot<C>> {
        self.channels
            .get(&(event.sender, event.kind))
            .map(|connections| connections.iter().map(|c| Rc::clone(&c.slot)).collect())
            .unwrap_or_default()
    }

    /// Invoke every slot connected to the event's channel with `ctx`.
    /// Returns the number of slots called.
    pub fn dispatch(&self, ctx: &mut C, event: &SignalEvent) -> usize {
        let slots = self.slots_for(event);
        tracing::trace!(target: TARGET, kind = ?event.kind, sender = ?event.sender, receivers = slots.len(), "dispatching signal");
        for slot in &slots {
            slot(ctx, event);
        }
        slots.len()
    }

    /// Queue an event for later dispatch.
    pub fn enqueue(&mut self, event: SignalEvent) {
        tracing::trace!(target: TARGET, kind = ?event.kind, sender = ?event.sender, "queued signal");
        self.queue.push_back(event);
    }

    /// Take the oldest queued event.
    pub fn pop_queued(&mut self) -> Option<SignalEvent> {
        self.queue.pop_front()
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::tree::Tree;

    fn nodes(count: usize) -> (Tree, Vec<NodeId>) {
        let mut tree = Tree::new();
        let ids = (0..count).map(|_| tree.create_node("Node", "")).collect();
        (tree, ids)
    }

    #[test]
    fn test_single_connection_per_receiver() {
        let (_tree, ids) = nodes(3);
        let (sender, r1, r2) = (ids[0], ids[1], ids[2]);
        let mut bus: SignalBus<Vec<&'static str>> = SignalBus::new();

        assert!(!bus.connect(sender, SignalKind::Selected, r1, |log, _| log.push("r1-a")));
        assert!(bus.connect(sender, SignalKind::Selected, r1, |log, _| log.push("r1-b")));
        assert!(!bus.connect(sender, SignalKind::Selected, r2, |log, _| log.push("r2")));
        assert_eq!(bus.connection_count(sender, SignalKind::Selected), 2);

        let mut log = Vec::new();
        let called = bus.dispatch(&mut log, &SignalEvent::new(SignalKind::Selected, sender));
        assert_eq!(called, 2);
        assert_eq!(log, vec!["r1-b", "r2"]);
    }

    #[test]
    fn test_channels_are_per_kind() {
        let (_tree, ids) = nodes(2);
        let mut bus: SignalBus<u32> = SignalBus::new();
        bus.connect(ids[0], SignalKind::Clicked, ids[1], |n, _| *n += 1);

        let mut count = 0;
        bus.dispatch(&mut count, &SignalEvent::new(SignalKind::Selected, ids[0]));
        assert_eq!(count, 0);
        bus.dispatch(&mut count, &SignalEvent::new(SignalKind::Clicked, ids[0]));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_disconnect() {
        let (_tree, ids) = nodes(3);
        let mut bus: SignalBus<()> = SignalBus::new();
        bus.connect(ids[0], SignalKind::Clicked, ids[1], |_, _| {});
        bus.connect(ids[1], SignalKind::Clicked, ids[2], |_, _| {});

        assert!(bus.disconnect(ids[0], SignalKind::Clicked, ids[1]));
        assert!(!bus.disconnect(ids[0], SignalKind::Clicked, ids[1]));

        bus.connect(ids[0], SignalKind::Clicked, ids[1], |_, _| {});
        bus.enqueue(SignalEvent::new(SignalKind::Clicked, ids[1]));
        bus.disconnect_node(ids[1]);
        assert_eq!(bus.connection_count(ids[0], SignalKind::Clicked), 0);
        assert_eq!(bus.connection_count(ids[1], SignalKind::Clicked), 0);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_queue_is_fifo() {
        let (_tree, ids) = nodes(2);
        let mut bus: SignalBus<()> = SignalBus::new();
        bus.enqueue(SignalEvent::new(SignalKind::Selected, ids[0]));
        bus.enqueue(SignalEvent::new(SignalKind::Clicked, ids[1]));

        assert_eq!(bus.pending(), 2);
        assert_eq!(bus.pop_queued().map(|e| e.kind), Some(SignalKind::Selected));
        assert_eq!(bus.pop_queued().map(|e| e.kind), Some(SignalKind::Clicked));
        assert!(bus.pop_queued().is_none());
    }

    #[test]
    fn test_payload() {
        let (_tree, ids) = nodes(2);
        let seen = Rc::new(RefCell::new(None));
        let seen_in_slot = Rc::clone(&seen);
        let mut bus: SignalBus<()> = SignalBus::new();
        bus.connect(ids[0], SignalKind::TabSelected, ids[1], move |_, event| {
            *seen_in_slot.borrow_mut() = event.payload_as::<usize>().copied();
        });

        let event = SignalEvent::new(SignalKind::TabSelected, ids[0]).with_payload(2usize);
        assert!(event.payload_as::<String>().is_none());
        bus.dispatch(&mut (), &event);
        assert_eq!(*seen.borrow(), Some(2));
    }
}
