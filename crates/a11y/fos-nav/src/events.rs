//! Tree events
//!
//! Subscriptions to accessibility tree notifications. Every `subscribe`
//! returns a [`Subscription`] handle; owners drop their listeners with
//! `unsubscribe` or, on teardown, `unsubscribe_all`.

use std::collections::HashMap;
use std::fmt;

use crate::NodeId;

/// Event kind, used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    TextChanged,
    ChildrenChanged,
    NodeRemoved,
    LoadComplete,
}

/// Tree notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    Focus(NodeId),
    TextChanged(NodeId),
    /// Children of this node were added, removed or reordered
    ChildrenChanged(NodeId),
    NodeRemoved(NodeId),
    LoadComplete(NodeId),
}

impl TreeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Focus(_) => EventKind::Focus,
            Self::TextChanged(_) => EventKind::TextChanged,
            Self::ChildrenChanged(_) => EventKind::ChildrenChanged,
            Self::NodeRemoved(_) => EventKind::NodeRemoved,
            Self::LoadComplete(_) => EventKind::LoadComplete,
        }
    }

    pub fn target(&self) -> NodeId {
        match *self {
            Self::Focus(n)
            | Self::TextChanged(n)
            | Self::ChildrenChanged(n)
            | Self::NodeRemoved(n)
            | Self::LoadComplete(n) => n,
        }
    }
}

/// Handle for one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

type Listener = Box<dyn FnMut(&TreeEvent)>;

/// Listener registry and dispatcher
#[derive(Default)]
pub struct EventHub {
    listeners: HashMap<EventKind, Vec<(u64, Listener)>>,
    next_id: u64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&TreeEvent) + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.entry(kind).or_default().push((id, Box::new(listener)));
        Subscription { id, kind }
    }

    /// Remove one listener; false if it was already gone
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Some(list) = self.listeners.get_mut(&subscription.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        list.len() != before
    }

    /// Remove every listener
    pub fn unsubscribe_all(&mut self) {
        let count = self.listener_count();
        self.listeners.clear();
        tracing::debug!("Removed {} tree event listeners", count);
    }

    /// Deliver `event` to its listeners in subscription order; returns how many ran
    pub fn dispatch(&mut self, event: &TreeEvent) -> usize {
        let Some(list) = self.listeners.get_mut(&event.kind()) else {
            return 0;
        };
        for (_, listener) in list.iter_mut() {
            listener(event);
        }
        tracing::trace!("Dispatched {:?} to {} listeners", event, list.len());
        list.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
