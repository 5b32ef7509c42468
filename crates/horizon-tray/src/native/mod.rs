//! The native backend, built on `tray-icon` and its `muda` menus.
//!
//! Platform specifics:
//!
//! - **Linux**: trays are exported through libappindicator and driven by GTK.
//!   [`NativeBackend::initialize`] calls `gtk::init`, and every
//!   `update()` tick runs pending GTK iterations.
//! - **Windows**: trays live in a hidden window on the initializing thread;
//!   `update()` drains that thread's message queue.
//! - **macOS**: trays are `NSStatusItem`s; `update()` dispatches pending
//!   `NSApplication` events. Must run on the main thread.
//!
//! All native handles are main-thread objects. Create, mutate and destroy
//! trays on the thread that initialized the context.

mod convert;
mod menu;
mod pump;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_tray_core::{
    Error, EventSink, Icon, NativeTray, PlatformBackend, PlatformError, RealizedTray, Result,
    TraySpec,
};
use parking_lot::RwLock;
use tray_icon::menu::MenuEvent as NativeMenuEvent;
use tray_icon::{TrayIconBuilder as NativeTrayBuilder, TrayIconEvent};

use self::menu::CheckHandle;

/// Logging target for the native backend.
const TARGET: &str = "horizon_tray::native";

type CheckMap = Arc<RwLock<HashMap<String, CheckHandle>>>;

/// [`PlatformBackend`] for the desktop tray of the current OS.
pub struct NativeBackend {
    checks: CheckMap,
    handlers_installed: AtomicBool,
}

impl NativeBackend {
    /// Create the backend. Nothing touches the OS until `initialize`.
    pub fn new() -> Self {
        Self {
            checks: Arc::default(),
            handlers_installed: AtomicBool::new(false),
        }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBackend for NativeBackend {
    fn name(&self) -> &'static str {
        if cfg!(target_os = "linux") {
            "native-gtk"
        } else if cfg!(target_os = "windows") {
            "native-win32"
        } else if cfg!(target_os = "macos") {
            "native-appkit"
        } else {
            "native-unsupported"
        }
    }

    fn initialize(&self) -> Result<()> {
        pump::initialize()
    }

    fn install_event_sink(&self, sink: EventSink) {
        if self.handlers_installed.swap(true, Ordering::AcqRel) {
            tracing::warn!(target: TARGET, "event handlers already installed, replacing");
        }

        let tray_sink = sink.clone();
        TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
            match convert::tray_event(&event) {
                Some(event) => tray_sink.tray(event),
                None => tracing::trace!(target: TARGET, ?event, "ignored tray event"),
            }
        }));

        let checks = Arc::clone(&self.checks);
        NativeMenuEvent::set_event_handler(Some(move |event: NativeMenuEvent| {
            let id: &str = event.id().as_ref();
            let checked = checks.read().get(id).map(CheckHandle::is_checked);
            sink.menu_activated(id, checked);
        }));
    }

    fn create_tray(&self, spec: TraySpec) -> Result<RealizedTray> {
        let mut builder = NativeTrayBuilder::new()
            .with_id(spec.id.as_str())
            .with_icon(convert::tray_icon(&spec.icon)?);
        if let Some(tooltip) = &spec.tooltip {
            builder = builder.with_tooltip(tooltip);
        }
        if let Some(title) = &spec.title {
            builder = builder.with_title(title);
        }

        let mut peers = HashMap::new();
        let mut check_ids = Vec::new();
        if let Some(nodes) = &spec.menu {
            let built = menu::build_menu(nodes)?;
            peers = built.peers;
            let mut checks = self.checks.write();
            for (id, handle) in built.checks {
                check_ids.push(id.clone());
                checks.insert(id, handle);
            }
            builder = builder.with_menu(Box::new(built.menu));
        }

        let tray = match builder.build() {
            Ok(tray) => tray,
            Err(e) => return Err(abort_create(&self.checks, &check_ids, e.to_string())),
        };
        if !spec.visible {
            if let Err(e) = tray.set_visible(false) {
                return Err(abort_create(&self.checks, &check_ids, e.to_string()));
            }
        }

        tracing::debug!(target: TARGET, id = %spec.id, peers = peers.len(), "created native tray");
        Ok(RealizedTray {
            native: Box::new(NativeTrayHandle {
                tray: Some(tray),
                checks: Arc::clone(&self.checks),
                check_ids,
            }),
            peers,
        })
    }

    fn pump_messages(&self, budget: usize) -> usize {
        pump::pump(budget)
    }
}

fn forget_checks(checks: &CheckMap, ids: &[String]) {
    let mut checks = checks.write();
    for id in ids {
        checks.remove(id);
    }
}

/// Undo the check registrations of a tray that failed to come up.
fn abort_create(checks: &CheckMap, ids: &[String], message: String) -> Error {
    forget_checks(checks, ids);
    PlatformError::create_tray(message).into()
}

/// A `tray-icon` tray owned by a `TrayIcon`.
struct NativeTrayHandle {
    tray: Option<tray_icon::TrayIcon>,
    checks: CheckMap,
    check_ids: Vec<String>,
}

// SAFETY: `tray_icon::TrayIcon` is a main-thread object; the engine only
// touches it from the thread that created it (see module docs).
unsafe impl Send for NativeTrayHandle {}

impl NativeTrayHandle {
    fn tray(&self) -> Result<&tray_icon::TrayIcon> {
        self.tray
            .as_ref()
            .ok_or_else(|| PlatformError::update_tray("tray already destroyed").into())
    }
}

impl NativeTray for NativeTrayHandle {
    fn set_icon(&mut self, icon: Option<&Icon>) -> Result<()> {
        let icon = icon.map(convert::tray_icon).transpose()?;
        self.tray()?
            .set_icon(icon)
            .map_err(|e| PlatformError::update_tray(e.to_string()).into())
    }

    fn set_tooltip(&mut self, tooltip: Option<&str>) -> Result<()> {
        self.tray()?
            .set_tooltip(tooltip)
            .map_err(|e| PlatformError::update_tray(e.to_string()).into())
    }

    fn set_title(&mut self, title: Option<&str>) -> Result<()> {
        self.tray()?.set_title(title);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.tray()?
            .set_visible(visible)
            .map_err(|e| PlatformError::update_tray(e.to_string()).into())
    }

    fn destroy(&mut self) {
        forget_checks(&self.checks, &self.check_ids);
        if let Some(tray) = self.tray.take() {
            if let Err(e) = tray.set_visible(false) {
                tracing::debug!(target: TARGET, error = %e, "failed to hide tray before removal");
            }
            // Dropping the handle removes the entry from the tray.
            drop(tray);
        }
    }
}

impl Drop for NativeTrayHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}
