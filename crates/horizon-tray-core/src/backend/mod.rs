//! The platform capability interface.
//!
//! A [`PlatformBackend`] knows how to initialize the OS tray subsystem,
//! create native tray entries with menus, and pump OS messages. The engine
//! talks to the OS only through this trait, so the whole engine can run
//! against [`MockBackend`] in tests.

mod mock;

pub use mock::{DeliveryMode, MockBackend, MockTrayState};

use std::collections::HashMap;
use std::sync::Arc;

use crate::bridge::EventSink;
use crate::error::Result;
use crate::icon::Icon;
use crate::menu::{MenuId, PredefinedMenuItem, TrayId};

/// A menu node with its current runtime state, ready to be rendered.
#[derive(Debug, Clone)]
pub enum ResolvedNode {
    /// A plain item.
    Item {
        id: MenuId,
        text: String,
        enabled: bool,
    },
    /// A check item.
    Check {
        id: MenuId,
        text: String,
        checked: bool,
        enabled: bool,
    },
    /// An item with an icon.
    Icon {
        id: MenuId,
        text: String,
        enabled: bool,
        icon: Icon,
    },
    /// A platform-standard item.
    Predefined(PredefinedMenuItem),
    /// A nested menu.
    Submenu {
        id: MenuId,
        text: String,
        enabled: bool,
        children: Vec<ResolvedNode>,
    },
}

impl ResolvedNode {
    /// Identifier of the node, if it has one.
    pub fn id(&self) -> Option<&MenuId> {
        match self {
            Self::Item { id, .. }
            | Self::Check { id, .. }
            | Self::Icon { id, .. }
            | Self::Submenu { id, .. } => Some(id),
            Self::Predefined(_) => None,
        }
    }
}

/// Everything a backend needs to create one native tray entry.
#[derive(Debug, Clone)]
pub struct TraySpec {
    /// Identifier reported back in tray events.
    pub id: TrayId,
    /// The tray image.
    pub icon: Icon,
    /// Hover tooltip.
    pub tooltip: Option<String>,
    /// Text shown next to the icon (macOS menu bar, some Linux panels).
    pub title: Option<String>,
    /// Initial visibility.
    pub visible: bool,
    /// The context menu, if any.
    pub menu: Option<Vec<ResolvedNode>>,
}

/// The result of realizing a tray: the native handle plus one peer per
/// identified menu node.
pub struct RealizedTray {
    /// The native tray entry.
    pub native: Box<dyn NativeTray>,
    /// Native menu peers keyed by node identifier.
    pub peers: HashMap<MenuId, Arc<dyn MenuPeer>>,
}

impl std::fmt::Debug for RealizedTray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealizedTray")
            .field("peers", &self.peers.len())
            .finish_non_exhaustive()
    }
}

/// A native tray entry owned by a [`TrayIcon`](crate::TrayIcon).
pub trait NativeTray: Send {
    /// Replace the image; `None` clears it where the platform allows.
    fn set_icon(&mut self, icon: Option<&Icon>) -> Result<()>;

    /// Replace the tooltip.
    fn set_tooltip(&mut self, tooltip: Option<&str>) -> Result<()>;

    /// Replace the title.
    fn set_title(&mut self, title: Option<&str>) -> Result<()>;

    /// Show or hide the entry.
    fn set_visible(&mut self, visible: bool) -> Result<()>;

    /// Remove the entry from the tray. Called at most once.
    fn destroy(&mut self);
}

/// The native counterpart of one identified menu node.
///
/// The registry writes runtime changes to the peer after updating its own
/// state. Peers must tolerate calls of the wrong kind (for instance
/// `set_checked` on a submenu peer) by ignoring them.
pub trait MenuPeer: Send + Sync {
    /// Update the label.
    fn set_text(&self, text: &str);

    /// Update the checkmark.
    fn set_checked(&self, checked: bool);

    /// Update the enabled state.
    fn set_enabled(&self, enabled: bool);
}

/// Capability interface to the OS tray subsystem.
pub trait PlatformBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// One-time initialization of the OS side.
    fn initialize(&self) -> Result<()>;

    /// Install the sink that OS callbacks push events into.
    fn install_event_sink(&self, sink: EventSink);

    /// Create a native tray entry with its menu.
    fn create_tray(&self, spec: TraySpec) -> Result<RealizedTray>;

    /// Dispatch at most `budget` pending OS messages, returning how many
    /// were dispatched.
    fn pump_messages(&self, budget: usize) -> usize;
}
