//! Event bridge between platform callbacks and the host application.
//!
//! Platform callbacks may run on a thread the host does not control. They
//! push into two bounded channels (one for tray events, one for menu events)
//! and the host drains them with non-blocking polls. Ordering is FIFO within
//! each channel; nothing is promised across channels.
//!
//! When a channel is full the oldest queued event is discarded to make room,
//! so a host that stops polling loses old events rather than blocking the
//! platform thread or growing without bound.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::RwLock;

use crate::config::ContextConfig;
use crate::event::{MenuEvent, TrayEvent};
use crate::logging::targets;
use crate::menu::{MenuId, MenuRegistry};

// ============================================================================
// Channel
// ============================================================================

struct Channel<T> {
    name: &'static str,
    capacity: usize,
    sender: Sender<T>,
    receiver: Receiver<T>,
    dropped: AtomicU64,
}

impl<T> Channel<T> {
    fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            name,
            capacity,
            sender,
            receiver,
            dropped: AtomicU64::new(0),
        }
    }

    fn push(&self, mut event: T) {
        loop {
            match self.sender.try_send(event) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    // Another consumer may have emptied a slot in between; only
                    // count what we actually evicted.
                    if self.receiver.try_recv().is_ok() {
                        let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        tracing::warn!(
                            target: targets::BRIDGE,
                            channel = self.name,
                            capacity = self.capacity,
                            dropped,
                            "event queue full, dropped oldest event"
                        );
                    }
                    event = rejected;
                }
                // Unreachable while `self.receiver` is alive.
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    fn poll(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    fn len(&self) -> usize {
        self.receiver.len()
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

// ============================================================================
// EventBridge
// ============================================================================

struct BridgeInner {
    tray: Channel<TrayEvent>,
    menu: Channel<MenuEvent>,
}

/// Two bounded, drop-oldest FIFO queues carrying tray and menu events.
///
/// Cloning yields another handle to the same queues.
#[derive(Clone)]
pub struct EventBridge {
    inner: Arc<BridgeInner>,
}

impl EventBridge {
    /// Create a bridge with the given per-channel capacities (at least 1).
    pub fn new(tray_capacity: usize, menu_capacity: usize) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                tray: Channel::new("tray", tray_capacity),
                menu: Channel::new("menu", menu_capacity),
            }),
        }
    }

    /// Create a bridge sized from a context configuration.
    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(config.tray_queue_capacity, config.menu_queue_capacity)
    }

    /// Queue a tray event, evicting the oldest one if the channel is full.
    pub fn push_tray(&self, event: TrayEvent) {
        self.inner.tray.push(event);
    }

    /// Queue a menu event, evicting the oldest one if the channel is full.
    pub fn push_menu(&self, event: MenuEvent) {
        self.inner.menu.push(event);
    }

    /// Take the oldest pending tray event, if any. Never blocks.
    pub fn poll_tray(&self) -> Option<TrayEvent> {
        self.inner.tray.poll()
    }

    /// Take the oldest pending menu event, if any. Never blocks.
    pub fn poll_menu(&self) -> Option<MenuEvent> {
        self.inner.menu.poll()
    }

    /// Take every pending tray event, oldest first.
    pub fn drain_tray(&self) -> Vec<TrayEvent> {
        self.inner.tray.drain()
    }

    /// Take every pending menu event, oldest first.
    pub fn drain_menu(&self) -> Vec<MenuEvent> {
        self.inner.menu.drain()
    }

    /// Number of queued tray events.
    pub fn pending_tray(&self) -> usize {
        self.inner.tray.len()
    }

    /// Number of queued menu events.
    pub fn pending_menu(&self) -> usize {
        self.inner.menu.len()
    }

    /// Total tray events evicted because the channel was full.
    pub fn dropped_tray(&self) -> u64 {
        self.inner.tray.dropped()
    }

    /// Total menu events evicted because the channel was full.
    pub fn dropped_menu(&self) -> u64 {
        self.inner.menu.dropped()
    }

    /// Capacities of the tray and menu channels.
    pub fn capacity(&self) -> (usize, usize) {
        (self.inner.tray.capacity, self.inner.menu.capacity)
    }

    /// Discard all queued events.
    pub fn clear(&self) {
        let tray = self.inner.tray.drain().len();
        let menu = self.inner.menu.drain().len();
        tracing::debug!(target: targets::BRIDGE, tray, menu, "cleared event queues");
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("capacity", &self.capacity())
            .field("pending_tray", &self.pending_tray())
            .field("pending_menu", &self.pending_menu())
            .finish()
    }
}

// ============================================================================
// EventSink
// ============================================================================

/// Producer handle given to platform backends.
///
/// Backends call [`tray`](Self::tray) and
/// [`menu_activated`](Self::menu_activated) from their callbacks. The sink
/// also keeps read-only handles to the registries of realized menus so it can
/// log item labels alongside identifiers.
#[derive(Clone)]
pub struct EventSink {
    bridge: EventBridge,
    registries: Arc<RwLock<Vec<MenuRegistry>>>,
}

impl EventSink {
    /// Create a sink feeding `bridge`.
    pub fn new(bridge: EventBridge) -> Self {
        Self {
            bridge,
            registries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Forward a tray interaction.
    pub fn tray(&self, event: TrayEvent) {
        tracing::trace!(
            target: targets::BRIDGE,
            tray = %event.tray_id,
            event = event.event_type(),
            "tray event"
        );
        self.bridge.push_tray(event);
    }

    /// Forward a menu item activation.
    ///
    /// `checked` carries the new state when the platform has already toggled
    /// a check item's checkmark.
    pub fn menu_activated(&self, id: impl Into<MenuId>, checked: Option<bool>) {
        self.menu(MenuEvent::new(id, checked));
    }

    /// Forward a prebuilt menu event.
    ///
    /// A reported checked state is the one the platform now displays, so it
    /// is written into the owning registry before the event is queued.
    pub fn menu(&self, event: MenuEvent) {
        if let Some(checked) = event.checked {
            if let Some(registry) = self.registry_for(event.id.as_str()) {
                registry.record_checked(event.id.as_str(), checked);
            }
        }
        if tracing::enabled!(target: targets::BRIDGE, tracing::Level::TRACE) {
            let label = self.label(event.id.as_str());
            tracing::trace!(
                target: targets::BRIDGE,
                id = %event.id,
                label = label.as_deref().unwrap_or("<unregistered>"),
                checked = ?event.checked,
                "menu event"
            );
        }
        self.bridge.push_menu(event);
    }

    /// Look up the current label of `id` in any watched registry.
    pub fn label(&self, id: &str) -> Option<String> {
        self.registries.read().iter().find_map(|r| r.label(id))
    }

    /// The bridge this sink feeds.
    pub fn bridge(&self) -> &EventBridge {
        &self.bridge
    }

    pub(crate) fn watch_registry(&self, registry: &MenuRegistry) {
        let mut registries = self.registries.write();
        if !registries.iter().any(|r| r.ptr_eq(registry)) {
            registries.push(registry.clone());
        }
    }

    pub(crate) fn unwatch_registry(&self, registry: &MenuRegistry) {
        self.registries.write().retain(|r| !r.ptr_eq(registry));
    }

    /// Registry holding `id`.
    pub(crate) fn registry_for(&self, id: &str) -> Option<MenuRegistry> {
        self.registries
            .read()
            .iter()
            .find(|r| r.contains(id))
            .cloned()
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("bridge", &self.bridge)
            .field("registries", &self.registries.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Position, Rect, TrayEventKind};
    use crate::menu::{MenuItemBuilder, MenuNode, TrayId};
    use std::thread;

    fn enter(tray: &str) -> TrayEvent {
        TrayEvent::new(
            TrayId::new(tray),
            TrayEventKind::Enter,
            Position::default(),
            Rect::default(),
        )
    }

    #[test]
    fn test_fifo_per_channel() {
        let bridge = EventBridge::new(8, 8);
        bridge.push_menu(MenuEvent::new("a", None));
        bridge.push_tray(enter("t1"));
        bridge.push_menu(MenuEvent::new("b", None));
        bridge.push_tray(enter("t2"));

        assert_eq!(bridge.poll_menu().unwrap().id, "a");
        assert_eq!(bridge.poll_menu().unwrap().id, "b");
        assert!(bridge.poll_menu().is_none());
        assert_eq!(bridge.poll_tray().unwrap().tray_id.as_str(), "t1");
        assert_eq!(bridge.poll_tray().unwrap().tray_id.as_str(), "t2");
        assert!(bridge.poll_tray().is_none());
    }

    #[test]
    fn test_empty_poll_is_none() {
        let bridge = EventBridge::default();
        assert!(bridge.poll_tray().is_none());
        assert!(bridge.poll_menu().is_none());
        assert_eq!(bridge.capacity(), (256, 256));
    }

    #[test]
    fn test_drop_oldest_keeps_newest() {
        let bridge = EventBridge::new(4, 4);
        for i in 0..10 {
            bridge.push_menu(MenuEvent::new(format!("item-{i}"), None));
        }
        assert_eq!(bridge.pending_menu(), 4);
        assert_eq!(bridge.dropped_menu(), 6);
        assert_eq!(bridge.dropped_tray(), 0);

        let ids: Vec<_> = bridge
            .drain_menu()
            .into_iter()
            .map(|e| e.id.into_string())
            .collect();
        assert_eq!(ids, vec!["item-6", "item-7", "item-8", "item-9"]);
    }

    #[test]
    fn test_channels_overflow_independently() {
        let bridge = EventBridge::new(1, 2);
        bridge.push_tray(enter("a"));
        bridge.push_tray(enter("b"));
        bridge.push_menu(MenuEvent::new("x", None));
        assert_eq!(bridge.dropped_tray(), 1);
        assert_eq!(bridge.dropped_menu(), 0);
        assert_eq!(bridge.poll_tray().unwrap().tray_id.as_str(), "b");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bridge = EventBridge::new(0, 0);
        assert_eq!(bridge.capacity(), (1, 1));
        bridge.push_menu(MenuEvent::new("only", None));
        assert_eq!(bridge.pending_menu(), 1);
    }

    #[test]
    fn test_clear() {
        let bridge = EventBridge::new(4, 4);
        bridge.push_tray(enter("a"));
        bridge.push_menu(MenuEvent::new("x", None));
        bridge.clear();
        assert_eq!(bridge.pending_tray(), 0);
        assert_eq!(bridge.pending_menu(), 0);
    }

    #[test]
    fn test_cross_thread_producers() {
        let bridge = EventBridge::new(1024, 1024);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let bridge = bridge.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        bridge.push_menu(MenuEvent::new(format!("{t}-{i}"), None));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = bridge.drain_menu();
        assert_eq!(events.len(), 400);
        // Per-producer order survives interleaving.
        for t in 0..4 {
            let prefix = format!("{t}-");
            let seq: Vec<usize> = events
                .iter()
                .filter_map(|e| e.id.as_str().strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_sink_labels_from_watched_registry() {
        let sink = EventSink::new(EventBridge::new(4, 4));
        let registry = MenuRegistry::new();
        let hello: MenuNode = MenuItemBuilder::new()
            .with_id("hello")
            .with_text("Hello")
            .build()
            .unwrap()
            .into();
        registry.register(&[hello]).unwrap();

        assert!(sink.label("hello").is_none());
        sink.watch_registry(&registry);
        sink.watch_registry(&registry);
        assert_eq!(sink.label("hello").as_deref(), Some("Hello"));
        assert!(sink.registry_for("hello").is_some());

        sink.menu_activated("hello", None);
        assert_eq!(sink.bridge().poll_menu().unwrap().id, "hello");

        sink.unwatch_registry(&registry);
        assert!(sink.label("hello").is_none());
    }
}
