//! The platform message pump.
//!
//! Some platforms only deliver tray callbacks while their native event loop
//! runs (GTK on Linux, the thread message queue on Windows). Hosts that do
//! not run such a loop drive it through [`EventPump::update`], which
//! dispatches a bounded batch of pending messages and returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::backend::PlatformBackend;
use crate::bridge::EventSink;
use crate::error::{Result, StateError};
use crate::logging::targets;

/// One-time platform initialization plus bounded per-tick message pumping.
pub struct EventPump {
    backend: Arc<dyn PlatformBackend>,
    budget: usize,
    initialized: AtomicBool,
    // Serializes initialization attempts.
    init_lock: Mutex<()>,
    ticks: AtomicU64,
}

impl EventPump {
    /// Create a pump that dispatches at most `budget` messages per tick.
    pub fn new(backend: Arc<dyn PlatformBackend>, budget: usize) -> Self {
        Self {
            backend,
            budget: budget.max(1),
            initialized: AtomicBool::new(false),
            init_lock: Mutex::new(()),
            ticks: AtomicU64::new(0),
        }
    }

    /// Initialize the platform and install the callbacks feeding `sink`.
    ///
    /// # Errors
    ///
    /// - [`StateError::AlreadyInitialized`] on any call after a successful one
    /// - [`PlatformError`](crate::PlatformError) if the platform refuses; the
    ///   pump stays uninitialized and the call may be retried
    #[tracing::instrument(skip_all, target = "horizon_tray_core::pump", level = "debug")]
    pub fn initialize(&self, sink: &EventSink) -> Result<()> {
        let _guard = self.init_lock.lock();
        if self.initialized.load(Ordering::Acquire) {
            return Err(StateError::AlreadyInitialized.into());
        }

        if let Err(err) = self.backend.initialize() {
            tracing::error!(target: targets::PUMP, backend = self.backend.name(), %err, "platform initialization failed");
            return Err(err);
        }
        self.backend.install_event_sink(sink.clone());
        self.initialized.store(true, Ordering::Release);

        tracing::info!(target: targets::PUMP, backend = self.backend.name(), budget = self.budget, "tray platform initialized");
        Ok(())
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Run one bounded pump tick.
    ///
    /// Returns the number of OS messages dispatched. Before initialization
    /// this does nothing and returns 0. Platforms that push events from their
    /// own thread may always return 0.
    pub fn update(&self) -> usize {
        if !self.is_initialized() {
            return 0;
        }
        self.ticks.fetch_add(1, Ordering::Relaxed);
        let dispatched = self.backend.pump_messages(self.budget);
        if dispatched > 0 {
            tracing::trace!(target: targets::PUMP, dispatched, "pumped platform messages");
        }
        dispatched
    }

    /// Number of ticks run since initialization.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Maximum messages dispatched per tick.
    pub fn budget(&self) -> usize {
        self.budget
    }
}

impl std::fmt::Debug for EventPump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPump")
            .field("backend", &self.backend.name())
            .field("budget", &self.budget)
            .field("initialized", &self.is_initialized())
            .field("ticks", &self.ticks())
            .finish()
    }
}
