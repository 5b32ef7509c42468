//! Tray icons.
//!
//! A [`TrayIcon`] is one entry in the platform's notification area, with an
//! optional context menu. It is created with [`TrayIconBuilder`] against an
//! initialized [`TrayContext`] and removed from the tray when destroyed or
//! dropped.
//!
//! # Example
//!
//! ```
//! use horizon_tray_core::menu::{Menu, MenuItemBuilder};
//! use horizon_tray_core::{Icon, MockBackend, TrayContext, TrayIconBuilder};
//!
//! let context = TrayContext::new(MockBackend::new());
//! context.initialize().unwrap();
//!
//! let menu = Menu::new();
//! menu.append_menu_item(&MenuItemBuilder::new().with_id("quit").with_text("Quit").build().unwrap())
//!     .unwrap();
//!
//! let tray = TrayIconBuilder::new()
//!     .with_icon(Icon::from_rgba(vec![255, 0, 0, 255], 1, 1).unwrap())
//!     .with_tooltip("My App")
//!     .with_menu(&menu)
//!     .build(&context)
//!     .unwrap();
//!
//! menu.set_text("quit", "Exit").unwrap();
//! tray.destroy();
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{MenuPeer, NativeTray, TraySpec};
use crate::bridge::EventSink;
use crate::context::TrayContext;
use crate::error::{Result, StateError, ValidationError};
use crate::icon::Icon;
use crate::logging::targets;
use crate::menu::{Menu, MenuId, TrayId};

// ============================================================================
// TrayState
// ============================================================================

/// Lifecycle stage of a tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayState {
    /// The native entry exists.
    Built,
    /// The native entry has been removed; setters fail.
    Destroyed,
}

// ============================================================================
// TrayIconBuilder
// ============================================================================

/// Builder for [`TrayIcon`].
#[derive(Debug, Clone)]
pub struct TrayIconBuilder {
    id: Option<TrayId>,
    icon: Option<Icon>,
    menu: Option<Menu>,
    tooltip: Option<String>,
    title: Option<String>,
    visible: bool,
}

impl Default for TrayIconBuilder {
    fn default() -> Self {
        Self {
            id: None,
            icon: None,
            menu: None,
            tooltip: None,
            title: None,
            visible: true,
        }
    }
}

impl TrayIconBuilder {
    /// Create a builder for a visible tray with no icon or menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tray identifier reported in [`TrayEvent`](crate::TrayEvent)s.
    pub fn with_id(mut self, id: impl Into<TrayId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the image. Required.
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Attach a context menu. The builder keeps a handle to the same menu.
    pub fn with_menu(mut self, menu: &Menu) -> Self {
        self.menu = Some(menu.clone());
        self
    }

    /// Set the hover tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the title shown next to the icon where the platform supports it.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the initial visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Create the native tray entry and realize its menu.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingIcon`] if no icon was set
    /// - [`StateError::NotInitialized`] before [`TrayContext::initialize`]
    /// - [`StateError::TreeAlreadyRealized`] if the menu already belongs to a tray
    /// - [`PlatformError`](crate::PlatformError) if the platform refuses; the
    ///   menu is left unrealized and can still be modified
    #[tracing::instrument(skip_all, target = "horizon_tray_core::tray", level = "debug")]
    pub fn build(&self, context: &TrayContext) -> Result<TrayIcon> {
        let icon = self.icon.clone().ok_or(ValidationError::MissingIcon)?;
        if !context.is_initialized() {
            return Err(StateError::NotInitialized.into());
        }

        let id = self.id.clone().unwrap_or_else(TrayId::generate);
        if let Some(menu) = &self.menu {
            menu.claim()?;
        }

        let spec = TraySpec {
            id: id.clone(),
            icon: icon.clone(),
            tooltip: self.tooltip.clone(),
            title: self.title.clone(),
            visible: self.visible,
            menu: self.menu.as_ref().map(Menu::resolve),
        };
        let realized = match context.backend().create_tray(spec) {
            Ok(realized) => realized,
            Err(err) => {
                if let Some(menu) = &self.menu {
                    menu.release();
                }
                tracing::error!(target: targets::TRAY, %id, %err, "failed to create tray icon");
                return Err(err);
            }
        };

        if let Some(menu) = &self.menu {
            menu.registry().attach_peers(&realized.peers);
            context.sink().watch_registry(menu.registry());
        }

        tracing::info!(
            target: targets::TRAY,
            %id,
            backend = context.backend_name(),
            menu_nodes = self.menu.as_ref().map_or(0, |m| m.registry().len()),
            "tray icon created"
        );

        Ok(TrayIcon {
            id,
            menu: self.menu.clone(),
            sink: context.sink().clone(),
            inner: Mutex::new(TrayInner {
                native: Some(realized.native),
                peers: realized.peers,
                icon: Some(icon),
                tooltip: self.tooltip.clone(),
                title: self.title.clone(),
                visible: self.visible,
            }),
        })
    }
}

// ============================================================================
// TrayIcon
// ============================================================================

struct TrayInner {
    // `None` once destroyed.
    native: Option<Box<dyn NativeTray>>,
    // Strong owners of the peers the registry references weakly.
    peers: HashMap<MenuId, Arc<dyn MenuPeer>>,
    icon: Option<Icon>,
    tooltip: Option<String>,
    title: Option<String>,
    visible: bool,
}

impl TrayInner {
    fn native(&mut self) -> Result<&mut (dyn NativeTray + 'static)> {
        self.native
            .as_deref_mut()
            .ok_or_else(|| StateError::Destroyed.into())
    }
}

/// An entry in the platform's notification area.
///
/// Native tray handles belong to the thread that initialized the context;
/// create, modify and destroy tray icons from that thread.
pub struct TrayIcon {
    id: TrayId,
    menu: Option<Menu>,
    sink: EventSink,
    inner: Mutex<TrayInner>,
}

impl TrayIcon {
    /// The tray identifier.
    pub fn id(&self) -> &TrayId {
        &self.id
    }

    /// The attached menu, if any.
    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> TrayState {
        if self.inner.lock().native.is_some() {
            TrayState::Built
        } else {
            TrayState::Destroyed
        }
    }

    /// Whether the tray has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state() == TrayState::Destroyed
    }

    /// Replace the image.
    pub fn set_icon(&self, icon: Option<Icon>) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.native()?.set_icon(icon.as_ref())?;
        inner.icon = icon;
        Ok(())
    }

    /// The current image.
    pub fn icon(&self) -> Option<Icon> {
        self.inner.lock().icon.clone()
    }

    /// Replace the tooltip.
    pub fn set_tooltip(&self, tooltip: Option<impl Into<String>>) -> Result<()> {
        let tooltip = tooltip.map(Into::into);
        let mut inner = self.inner.lock();
        inner.native()?.set_tooltip(tooltip.as_deref())?;
        inner.tooltip = tooltip;
        Ok(())
    }

    /// The current tooltip.
    pub fn tooltip(&self) -> Option<String> {
        self.inner.lock().tooltip.clone()
    }

    /// Replace the title.
    pub fn set_title(&self, title: Option<impl Into<String>>) -> Result<()> {
        let title = title.map(Into::into);
        let mut inner = self.inner.lock();
        inner.native()?.set_title(title.as_deref())?;
        inner.title = title;
        Ok(())
    }

    /// The current title.
    pub fn title(&self) -> Option<String> {
        self.inner.lock().title.clone()
    }

    /// Show or hide the entry.
    pub fn set_visible(&self, visible: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.native()?.set_visible(visible)?;
        inner.visible = visible;
        Ok(())
    }

    /// Whether the entry is visible.
    pub fn is_visible(&self) -> bool {
        let inner = self.inner.lock();
        inner.native.is_some() && inner.visible
    }

    /// Remove the entry from the tray and release its menu peers.
    ///
    /// Calling this more than once has no further effect. The menu stays
    /// realized: its shape cannot change, but its runtime state can still be
    /// read and written.
    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        let Some(mut native) = inner.native.take() else {
            return;
        };
        native.destroy();
        inner.peers.clear();
        if let Some(menu) = &self.menu {
            menu.registry().detach_peers();
            self.sink.unwatch_registry(menu.registry());
        }
        tracing::info!(target: targets::TRAY, id = %self.id, "tray icon destroyed");
    }
}

impl Drop for TrayIcon {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for TrayIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("TrayIcon")
            .field("id", &self.id)
            .field("destroyed", &inner.native.is_none())
            .field("tooltip", &inner.tooltip)
            .field("title", &inner.title)
            .field("visible", &inner.visible)
            .field("menu", &self.menu.is_some())
            .finish()
    }
}
