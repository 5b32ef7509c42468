//! Per-platform native message pumps.
//!
//! Each platform provides `initialize` (one-time setup on the UI thread) and
//! `pump` (dispatch at most `budget` pending messages without blocking).

use horizon_tray_core::Result;

#[cfg(target_os = "linux")]
mod platform {
    use horizon_tray_core::{PlatformError, Result};

    pub fn initialize() -> Result<()> {
        gtk::init().map_err(|e| PlatformError::initialize(format!("failed to initialize GTK: {e}")))?;
        Ok(())
    }

    pub fn pump(budget: usize) -> usize {
        let mut dispatched = 0;
        while dispatched < budget && gtk::events_pending() {
            gtk::main_iteration_do(false);
            dispatched += 1;
        }
        dispatched
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use horizon_tray_core::Result;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage,
    };

    pub fn initialize() -> Result<()> {
        // The tray's hidden window is created with the first tray icon.
        Ok(())
    }

    pub fn pump(budget: usize) -> usize {
        let mut dispatched = 0;
        // SAFETY: standard non-blocking drain of this thread's message queue.
        unsafe {
            let mut msg = MSG::default();
            while dispatched < budget && PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
                dispatched += 1;
            }
        }
        dispatched
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use horizon_tray_core::{PlatformError, Result};
    use objc2::MainThreadMarker;
    use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy, NSEventMask};
    use objc2_foundation::{NSDate, NSDefaultRunLoopMode};

    fn main_thread() -> Result<MainThreadMarker> {
        MainThreadMarker::new().ok_or_else(|| {
            PlatformError::initialize("the tray must be initialized on the main thread").into()
        })
    }

    pub fn initialize() -> Result<()> {
        let mtm = main_thread()?;
        let app = NSApplication::sharedApplication(mtm);
        // Tray-only processes stay out of the Dock and the app switcher.
        app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
        unsafe { app.finishLaunching() };
        Ok(())
    }

    pub fn pump(budget: usize) -> usize {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::warn!(target: "horizon_tray::native", "pump called off the main thread");
            return 0;
        };
        let app = NSApplication::sharedApplication(mtm);
        let past = NSDate::distantPast();
        let mut dispatched = 0;
        while dispatched < budget {
            // SAFETY: called on the main thread with a valid run loop mode.
            let event = unsafe {
                app.nextEventMatchingMask_untilDate_inMode_dequeue(
                    NSEventMask::Any,
                    Some(&past),
                    NSDefaultRunLoopMode,
                    true,
                )
            };
            let Some(event) = event else { break };
            app.sendEvent(&event);
            dispatched += 1;
        }
        dispatched
    }
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
mod platform {
    use horizon_tray_core::{PlatformError, Result};

    pub fn initialize() -> Result<()> {
        Err(PlatformError::initialize("system tray is not supported on this platform").into())
    }

    pub fn pump(_budget: usize) -> usize {
        0
    }
}

/// Prepare the platform's UI toolkit on the calling thread.
pub(crate) fn initialize() -> Result<()> {
    platform::initialize()
}

/// Dispatch at most `budget` pending native messages.
pub(crate) fn pump(budget: usize) -> usize {
    platform::pump(budget)
}
