//! Signal/slot listener registries.
//!
//! Every notification the menu engine raises (index changed, item selected,
//! checkbox toggled, menu opened, ...) is a [`Signal`]. Listeners ("slots")
//! are plain closures connected through a shared reference and invoked
//! synchronously, in the order they were connected, every time the signal is
//! emitted. Emitting a signal with no listeners does nothing.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The listener registry for one event
//! - [`ConnectionId`] - Identifies a connected slot so it can be removed
//!
//! # Example
//!
//! ```
//! use overlay_menu_core::Signal;
//!
//! let index_changed = Signal::<usize>::new();
//!
//! let conn_id = index_changed.connect(|index| {
//!     println!("now at {}", index);
//! });
//!
//! index_changed.emit(3);
//! index_changed.disconnect(conn_id);
//! ```
//!
//! # Re-entrancy
//!
//! Slots are collected before any of them runs, so a slot may connect or
//! disconnect listeners on the signal that is invoking it. Such changes take
//! effect from the next emission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the slot again.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Connected slots plus the order they were connected in.
///
/// `SlotMap` reuses freed slots, so iteration order alone would not follow
/// connection order once something has been disconnected.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args> Connections<Args> {
    fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    fn snapshot(&self) -> Vec<Slot<Args>> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(*id).cloned())
            .collect()
    }
}

/// A type-safe event with any number of connected listeners.
///
/// # Type Parameter
///
/// - `Args`: The payload passed to connected slots by reference. Use `()` for
///   events without a payload, or a small struct / tuple otherwise.
///
/// # Thread Safety
///
/// The engine is single-threaded and tick-driven; the registry sits behind a
/// `parking_lot::Mutex` only so that slots can be connected through `&self`.
/// `Signal<Args>` is `Send + Sync`, slots must be as well.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections::new()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Slots are invoked in connection order. Returns a [`ConnectionId`] that
    /// can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use overlay_menu_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_none() {
            return false;
        }
        connections.order.retain(|existing| *existing != id);
        true
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        let mut connections = self.connections.lock();
        connections.slots.clear();
        connections.order.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Useful while rebuilding a
    /// menu to avoid a burst of intermediate notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// The registry lock is released before the first slot runs.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots = self.connections.lock().snapshot();
        if slots.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().slots.len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let ids: Vec<_> = (0..4)
            .map(|n| {
                let order = order.clone();
                signal.connect(move |_| order.lock().push(n))
            })
            .collect();

        // Free a slot so the next connection reuses it inside the slot map.
        signal.disconnect(ids[1]);
        let order_clone = order.clone();
        signal.connect(move |_| order_clone.lock().push(9));

        signal.emit(());
        assert_eq!(*order.lock(), vec![0, 2, 3, 9]);
    }

    #[test]
    fn test_emit_without_connections_is_noop() {
        let signal = Signal::<String>::new();
        assert_eq!(signal.connection_count(), 0);
        signal.emit("nobody listens".to_string());
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();

        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_can_connect_during_emit() {
        let signal = Arc::new(Signal::<i32>::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        let signal_clone = signal.clone();
        let received_clone = received.clone();
        signal.connect(move |&value| {
            let received_inner = received_clone.clone();
            signal_clone.connect(move |&v| received_inner.lock().push(v * 10));
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert_eq!(*received.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 2);
    }

    #[test]
    fn test_signal_with_tuple_args() {
        let signal = Signal::<(String, usize)>::new();
        let received = Arc::new(Mutex::new(None));

        let received_clone = received.clone();
        signal.connect(move |args| {
            *received_clone.lock() = Some(args.clone());
        });

        signal.emit(("Volume".to_string(), 4));

        assert_eq!(received.lock().clone(), Some(("Volume".to_string(), 4)));
    }
}
