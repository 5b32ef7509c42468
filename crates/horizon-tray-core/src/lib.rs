//! Core engine for Horizon Tray.
//!
//! This crate provides the platform-independent parts of a system-tray and
//! menu engine:
//!
//! - **Icons**: validated RGBA images converted once into the platform layout
//! - **Menus**: a tree of items, check items, icon items, predefined items
//!   and submenus, built with fluent builders
//! - **Menu Registry**: runtime label/checked/enabled state, written through
//!   to native menu peers after realization
//! - **Tray Icons**: the builder and lifecycle of tray entries
//! - **Event Bridge**: bounded drop-oldest queues carrying tray and menu
//!   events from platform callbacks to the host
//! - **Event Pump**: one-time platform initialization and bounded message
//!   pumping for hosts without their own event loop
//!
//! Platform access goes through the [`PlatformBackend`] trait. The
//! `horizon-tray` crate provides the native backend; [`MockBackend`] runs the
//! whole engine in-process.
//!
//! # Example
//!
//! ```
//! use horizon_tray_core::menu::{CheckMenuItemBuilder, Menu, MenuItemBuilder};
//! use horizon_tray_core::{Icon, MockBackend, TrayContext, TrayIconBuilder};
//!
//! let backend = MockBackend::new();
//! let context = TrayContext::new(backend.clone());
//! context.initialize().unwrap();
//!
//! let menu = Menu::new();
//! menu.append_check_menu_item(
//!     &CheckMenuItemBuilder::new().with_id("notif").with_text("Notifications").build().unwrap(),
//! )
//! .unwrap();
//! menu.append_menu_item(&MenuItemBuilder::new().with_id("quit").with_text("Quit").build().unwrap())
//!     .unwrap();
//!
//! let _tray = TrayIconBuilder::new()
//!     .with_id("main")
//!     .with_icon(Icon::from_rgba(vec![255, 0, 0, 255], 1, 1).unwrap())
//!     .with_menu(&menu)
//!     .build(&context)
//!     .unwrap();
//!
//! // The platform reports a click on "quit".
//! backend.simulate_menu_activation("quit");
//!
//! while let Some(event) = context.poll_menu_event() {
//!     if event.id == "quit" {
//!         break;
//!     }
//! }
//! ```

pub mod backend;
mod bridge;
mod config;
mod context;
mod error;
mod event;
mod icon;
pub mod logging;
pub mod menu;
mod pump;
mod tray;

pub use backend::{
    DeliveryMode, MenuPeer, MockBackend, MockTrayState, NativeTray, PlatformBackend, RealizedTray,
    ResolvedNode, TraySpec,
};
pub use bridge::{EventBridge, EventSink};
pub use config::{ContextConfig, DEFAULT_PUMP_BUDGET, DEFAULT_QUEUE_CAPACITY};
pub use context::TrayContext;
pub use error::{Error, PlatformError, Result, StateError, ValidationError};
pub use event::{
    ActivationReason, MenuEvent, MouseButton, MouseButtonState, Position, Rect, TrayEvent,
    TrayEventKind,
};
pub use icon::{Icon, PixelFormat};
pub use menu::{Menu, MenuId, TrayId};
pub use pump::EventPump;
pub use tray::{TrayIcon, TrayIconBuilder, TrayState};
