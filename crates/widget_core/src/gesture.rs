//! Host-level listener bookkeeping for drag gestures.
//!
//! A drag installs move/end listeners on the host for the lifetime of the
//! gesture. [`DragCapture`] owns those listeners and removes them when it is
//! dropped, so no gesture can leak host listeners.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use shared::domain::{ListenerId, NodeId};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerEvent {
    PointerMove,
    PointerUp,
    PointerCancel,
    MouseMove,
    MouseUp,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

impl ListenerEvent {
    pub const POINTER_DRAG: [ListenerEvent; 3] = [
        ListenerEvent::PointerMove,
        ListenerEvent::PointerUp,
        ListenerEvent::PointerCancel,
    ];
    pub const MOUSE_DRAG: [ListenerEvent; 2] = [ListenerEvent::MouseMove, ListenerEvent::MouseUp];
    pub const TOUCH_DRAG: [ListenerEvent; 3] = [
        ListenerEvent::TouchMove,
        ListenerEvent::TouchEnd,
        ListenerEvent::TouchCancel,
    ];
}

#[derive(Default)]
struct ListenerTable {
    next_id: i64,
    active: HashMap<ListenerId, (NodeId, ListenerEvent)>,
}

/// Listener table of the host document.
#[derive(Clone, Default)]
pub struct HostListeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl HostListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs one listener per event for `node`, owned by the returned
    /// capture.
    pub fn capture(&self, node: NodeId, events: &[ListenerEvent]) -> DragCapture {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids = Vec::with_capacity(events.len());
        for event in events {
            table.next_id += 1;
            let id = ListenerId(table.next_id);
            table.active.insert(id, (node, *event));
            ids.push(id);
        }
        trace!(%node, count = ids.len(), "host listeners installed");
        DragCapture {
            table: self.table.clone(),
            node,
            ids,
        }
    }

    pub fn active_count(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .len()
    }

    pub fn active_for(&self, node: NodeId) -> Vec<ListenerEvent> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events: Vec<(ListenerId, ListenerEvent)> = table
            .active
            .iter()
            .filter(|(_, (owner, _))| *owner == node)
            .map(|(id, (_, event))| (*id, *event))
            .collect();
        events.sort_by_key(|(id, _)| *id);
        events.into_iter().map(|(_, event)| event).collect()
    }
}

/// Listeners installed for one drag gesture.
pub struct DragCapture {
    table: Arc<Mutex<ListenerTable>>,
    node: NodeId,
    ids: Vec<ListenerId>,
}

impl DragCapture {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Drop for DragCapture {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        for id in &self.ids {
            table.active.remove(id);
        }
        trace!(node = %self.node, "host listeners removed");
    }
}
