//! Headless backend for tests and for hosts without a tray.
//!
//! `MockBackend` records every tray it creates and the state written to each
//! menu peer, and lets tests play the part of the OS by simulating clicks and
//! menu activations.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::{MenuPeer, NativeTray, PlatformBackend, RealizedTray, ResolvedNode, TraySpec};
use crate::bridge::EventSink;
use crate::error::{PlatformError, Result};
use crate::event::{
    MenuEvent, MouseButton, MouseButtonState, Position, Rect, TrayEvent, TrayEventKind,
};
use crate::icon::Icon;
use crate::logging::targets;
use crate::menu::{MenuId, TrayId};

/// When simulated OS events reach the event bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Events are pushed from the simulating call, like platforms whose
    /// callbacks fire on their own thread.
    #[default]
    Immediate,
    /// Events wait in a simulated OS queue until the pump dispatches them.
    Pumped,
}

/// Recorded state of one mock tray entry.
#[derive(Debug, Clone)]
pub struct MockTrayState {
    /// Tray identifier.
    pub id: TrayId,
    /// Current image.
    pub icon: Option<Icon>,
    /// Current tooltip.
    pub tooltip: Option<String>,
    /// Current title.
    pub title: Option<String>,
    /// Current visibility.
    pub visible: bool,
    /// Whether `destroy` was called.
    pub destroyed: bool,
    /// The menu as rendered at creation time.
    pub menu: Option<Vec<ResolvedNode>>,
}

#[derive(Debug)]
struct PeerState {
    text: String,
    checked: Option<bool>,
    enabled: bool,
}

struct MockPeer {
    state: Mutex<PeerState>,
}

impl MenuPeer for MockPeer {
    fn set_text(&self, text: &str) {
        self.state.lock().text = text.to_owned();
    }

    fn set_checked(&self, checked: bool) {
        let mut state = self.state.lock();
        if state.checked.is_some() {
            state.checked = Some(checked);
        }
    }

    fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }
}

struct MockTray {
    state: Arc<Mutex<MockTrayState>>,
}

impl NativeTray for MockTray {
    fn set_icon(&mut self, icon: Option<&Icon>) -> Result<()> {
        self.state.lock().icon = icon.cloned();
        Ok(())
    }

    fn set_tooltip(&mut self, tooltip: Option<&str>) -> Result<()> {
        self.state.lock().tooltip = tooltip.map(str::to_owned);
        Ok(())
    }

    fn set_title(&mut self, title: Option<&str>) -> Result<()> {
        self.state.lock().title = title.map(str::to_owned);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.state.lock().visible = visible;
        Ok(())
    }

    fn destroy(&mut self) {
        let mut state = self.state.lock();
        state.destroyed = true;
        state.visible = false;
    }
}

enum PendingEvent {
    Tray(TrayEvent),
    Activation { id: MenuId, peer: Weak<MockPeer> },
}

#[derive(Default)]
struct MockInner {
    initialized: bool,
    initialize_calls: usize,
    fail_initialize: Option<String>,
    fail_create_tray: Option<String>,
    sink: Option<EventSink>,
    trays: HashMap<TrayId, Arc<Mutex<MockTrayState>>>,
    peers: HashMap<MenuId, Weak<MockPeer>>,
    pending: VecDeque<PendingEvent>,
    dispatched: usize,
}

/// An in-process [`PlatformBackend`].
///
/// Clones share state, so a test can keep a handle after passing the backend
/// to a [`TrayContext`](crate::TrayContext).
#[derive(Clone, Default)]
pub struct MockBackend {
    mode: DeliveryMode,
    inner: Arc<Mutex<MockInner>>,
}

impl MockBackend {
    /// Create a backend with [`DeliveryMode::Immediate`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with the given delivery mode.
    pub fn with_mode(mode: DeliveryMode) -> Self {
        Self {
            mode,
            inner: Arc::default(),
        }
    }

    /// The delivery mode.
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    // ========================================================================
    // Failure injection
    // ========================================================================

    /// Make the next `initialize` fail with `message`.
    pub fn fail_next_initialize(&self, message: impl Into<String>) {
        self.inner.lock().fail_initialize = Some(message.into());
    }

    /// Make the next `create_tray` fail with `message`.
    pub fn fail_next_create_tray(&self, message: impl Into<String>) {
        self.inner.lock().fail_create_tray = Some(message.into());
    }

    // ========================================================================
    // Simulated OS input
    // ========================================================================

    /// Simulate a tray interaction. Returns `false` if the tray does not
    /// exist, has been destroyed, or no event sink is installed.
    pub fn simulate_tray_event(&self, tray_id: &str, kind: TrayEventKind) -> bool {
        let icon_rect = {
            let inner = self.inner.lock();
            match inner.trays.get(tray_id) {
                Some(state) if !state.lock().destroyed => Rect {
                    position: Position::new(0.0, 0.0),
                    width: 22,
                    height: 22,
                },
                _ => return false,
            }
        };
        let event = TrayEvent::new(
            TrayId::new(tray_id),
            kind,
            Position::new(11.0, 11.0),
            icon_rect,
        );
        self.deliver(PendingEvent::Tray(event))
    }

    /// Simulate a completed click (button release) on a tray icon.
    pub fn simulate_click(&self, tray_id: &str, button: MouseButton) -> bool {
        self.simulate_tray_event(
            tray_id,
            TrayEventKind::Click {
                button,
                state: MouseButtonState::Up,
            },
        )
    }

    /// Simulate a double-click on a tray icon.
    pub fn simulate_double_click(&self, tray_id: &str, button: MouseButton) -> bool {
        self.simulate_tray_event(tray_id, TrayEventKind::DoubleClick { button })
    }

    /// Simulate the user choosing a menu item.
    ///
    /// Like real platforms, a check item's checkmark flips on the peer when
    /// the activation is dispatched, and the event carries the new state.
    /// Returns `false` if the item has no live peer or is disabled.
    pub fn simulate_menu_activation(&self, id: &str) -> bool {
        let peer = self.inner.lock().peers.get(id).and_then(Weak::upgrade);
        let Some(peer) = peer else {
            tracing::debug!(target: targets::BACKEND, id, "no live peer for simulated activation");
            return false;
        };
        if !peer.state.lock().enabled {
            return false;
        }
        self.deliver(PendingEvent::Activation {
            id: MenuId::new(id),
            peer: Arc::downgrade(&peer),
        })
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Whether `initialize` succeeded.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().initialized
    }

    /// Number of `initialize` calls, including failed ones.
    pub fn initialize_calls(&self) -> usize {
        self.inner.lock().initialize_calls
    }

    /// Recorded state of a tray.
    pub fn tray(&self, id: &str) -> Option<MockTrayState> {
        self.inner.lock().trays.get(id).map(|s| s.lock().clone())
    }

    /// Number of trays that have not been destroyed.
    pub fn live_tray_count(&self) -> usize {
        self.inner
            .lock()
            .trays
            .values()
            .filter(|s| !s.lock().destroyed)
            .count()
    }

    /// Label currently shown by a menu peer.
    pub fn peer_text(&self, id: &str) -> Option<String> {
        self.peer(id).map(|p| p.state.lock().text.clone())
    }

    /// Checkmark currently shown by a menu peer.
    pub fn peer_checked(&self, id: &str) -> Option<bool> {
        self.peer(id).and_then(|p| p.state.lock().checked)
    }

    /// Enabled state currently shown by a menu peer.
    pub fn peer_enabled(&self, id: &str) -> Option<bool> {
        self.peer(id).map(|p| p.state.lock().enabled)
    }

    /// Events waiting in the simulated OS queue.
    pub fn pending_events(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Total events dispatched by the pump.
    pub fn dispatched_events(&self) -> usize {
        self.inner.lock().dispatched
    }

    fn peer(&self, id: &str) -> Option<Arc<MockPeer>> {
        self.inner.lock().peers.get(id).and_then(Weak::upgrade)
    }

    fn deliver(&self, event: PendingEvent) -> bool {
        let sink = {
            let mut inner = self.inner.lock();
            let Some(sink) = inner.sink.clone() else {
                return false;
            };
            if self.mode == DeliveryMode::Pumped {
                inner.pending.push_back(event);
                return true;
            }
            sink
        };
        dispatch(&sink, event);
        true
    }
}

fn dispatch(sink: &EventSink, event: PendingEvent) {
    match event {
        PendingEvent::Tray(event) => sink.tray(event),
        PendingEvent::Activation { id, peer } => {
            let Some(peer) = peer.upgrade() else {
                tracing::debug!(target: targets::BACKEND, %id, "peer gone before dispatch");
                return;
            };
            let checked = {
                let mut state = peer.state.lock();
                if !state.enabled {
                    return;
                }
                state.checked = state.checked.map(|c| !c);
                state.checked
            };
            sink.menu(MenuEvent::new(id, checked));
        }
    }
}

fn build_peers(
    nodes: &[ResolvedNode],
    strong: &mut HashMap<MenuId, Arc<dyn MenuPeer>>,
    weak: &mut HashMap<MenuId, Weak<MockPeer>>,
) {
    for node in nodes {
        let state = match node {
            ResolvedNode::Item { text, enabled, .. } | ResolvedNode::Icon { text, enabled, .. } => {
                PeerState {
                    text: text.clone(),
                    checked: None,
                    enabled: *enabled,
                }
            }
            ResolvedNode::Check {
                text,
                checked,
                enabled,
                ..
            } => PeerState {
                text: text.clone(),
                checked: Some(*checked),
                enabled: *enabled,
            },
            ResolvedNode::Submenu {
                text,
                enabled,
                children,
                ..
            } => {
                build_peers(children, strong, weak);
                PeerState {
                    text: text.clone(),
                    checked: None,
                    enabled: *enabled,
                }
            }
            ResolvedNode::Predefined(_) => continue,
        };
        let Some(id) = node.id() else { continue };
        let peer = Arc::new(MockPeer {
            state: Mutex::new(state),
        });
        weak.insert(id.clone(), Arc::downgrade(&peer));
        strong.insert(id.clone(), peer);
    }
}

impl PlatformBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn initialize(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.initialize_calls += 1;
        if let Some(message) = inner.fail_initialize.take() {
            return Err(PlatformError::initialize(message).into());
        }
        inner.initialized = true;
        Ok(())
    }

    fn install_event_sink(&self, sink: EventSink) {
        self.inner.lock().sink = Some(sink);
    }

    fn create_tray(&self, spec: TraySpec) -> Result<RealizedTray> {
        let mut inner = self.inner.lock();
        if let Some(message) = inner.fail_create_tray.take() {
            return Err(PlatformError::create_tray(message).into());
        }

        let mut peers = HashMap::new();
        let mut weak = HashMap::new();
        if let Some(menu) = &spec.menu {
            build_peers(menu, &mut peers, &mut weak);
        }
        inner.peers.retain(|_, peer| peer.strong_count() > 0);
        inner.peers.extend(weak);

        let state = Arc::new(Mutex::new(MockTrayState {
            id: spec.id.clone(),
            icon: Some(spec.icon),
            tooltip: spec.tooltip,
            title: spec.title,
            visible: spec.visible,
            destroyed: false,
            menu: spec.menu,
        }));
        inner.trays.insert(spec.id, Arc::clone(&state));

        Ok(RealizedTray {
            native: Box::new(MockTray { state }),
            peers,
        })
    }

    fn pump_messages(&self, budget: usize) -> usize {
        let (sink, batch) = {
            let mut inner = self.inner.lock();
            let Some(sink) = inner.sink.clone() else {
                return 0;
            };
            let take = budget.min(inner.pending.len());
            let batch: Vec<_> = inner.pending.drain(..take).collect();
            inner.dispatched += batch.len();
            (sink, batch)
        };
        let count = batch.len();
        for event in batch {
            dispatch(&sink, event);
        }
        count
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MockBackend")
            .field("mode", &self.mode)
            .field("initialized", &inner.initialized)
            .field("trays", &inner.trays.len())
            .field("pending", &inner.pending.len())
            .finish()
    }
}
