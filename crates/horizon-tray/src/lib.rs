//! Horizon Tray: system tray icons with native context menus.
//!
//! This crate combines the platform-independent engine from
//! [`horizon_tray_core`] with a native backend built on `tray-icon`, and
//! offers a process-wide context for hosts that want one tray subsystem per
//! process.
//!
//! # Example
//!
//! ```no_run
//! use horizon_tray::menu::{Menu, MenuItemBuilder, PredefinedMenuItem};
//! use horizon_tray::{Icon, TrayIconBuilder};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), horizon_tray::Error> {
//!     let context = horizon_tray::initialize()?;
//!
//!     let menu = Menu::new();
//!     menu.append_menu_item(&MenuItemBuilder::new().with_id("hello").with_text("Hello").build()?)?;
//!     menu.append_predefined_menu_item(&PredefinedMenuItem::separator())?;
//!     menu.append_menu_item(&MenuItemBuilder::new().with_id("quit").with_text("Quit").build()?)?;
//!
//!     let _tray = TrayIconBuilder::new()
//!         .with_icon(Icon::from_rgba(vec![255, 0, 0, 255], 1, 1)?)
//!         .with_tooltip("Horizon")
//!         .with_menu(&menu)
//!         .build(context)?;
//!
//!     loop {
//!         horizon_tray::update();
//!         while let Some(event) = horizon_tray::poll_menu_events() {
//!             if event.id == "quit" {
//!                 return Ok(());
//!             }
//!         }
//!         std::thread::sleep(Duration::from_millis(16));
//!     }
//! }
//! ```

mod native;

use std::sync::OnceLock;

pub use horizon_tray_core::*;
pub use native::NativeBackend;

/// The process-wide tray context.
static CONTEXT: OnceLock<TrayContext> = OnceLock::new();

/// Initialize the process-wide tray context with the native backend.
///
/// Call this once, on the thread that will create and pump trays (the main
/// thread on macOS).
///
/// # Errors
///
/// - [`StateError::AlreadyInitialized`] if a previous call succeeded
/// - [`PlatformError`] if the platform tray subsystem is unavailable; the
///   call may be retried
pub fn initialize() -> Result<&'static TrayContext> {
    init_with_config(ContextConfig::default())
}

/// Initialize the process-wide tray context with an explicit configuration.
///
/// The configuration of the first call wins; a retry after a platform
/// failure reuses it.
pub fn init_with_config(config: ContextConfig) -> Result<&'static TrayContext> {
    let context = CONTEXT.get_or_init(|| TrayContext::with_config(NativeBackend::new(), config));
    context.initialize()?;
    Ok(context)
}

/// The process-wide context, once initialized.
///
/// # Errors
///
/// [`StateError::NotInitialized`] before a successful [`initialize`].
pub fn context() -> Result<&'static TrayContext> {
    try_context().ok_or_else(|| StateError::NotInitialized.into())
}

/// The process-wide context, if initialized.
pub fn try_context() -> Option<&'static TrayContext> {
    CONTEXT.get().filter(|context| context.is_initialized())
}

/// Run one bounded tick of the native message pump.
///
/// Returns the number of dispatched messages; 0 before initialization.
pub fn update() -> usize {
    try_context().map_or(0, TrayContext::update)
}

/// Take the oldest pending tray event.
pub fn poll_tray_events() -> Option<TrayEvent> {
    try_context().and_then(TrayContext::poll_tray_event)
}

/// Take the oldest pending menu event.
pub fn poll_menu_events() -> Option<MenuEvent> {
    try_context().and_then(TrayContext::poll_menu_event)
}
