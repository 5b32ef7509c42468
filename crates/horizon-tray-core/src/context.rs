//! The tray context: backend, pump and event queues bundled together.

use std::sync::Arc;

use crate::backend::PlatformBackend;
use crate::bridge::{EventBridge, EventSink};
use crate::config::ContextConfig;
use crate::error::Result;
use crate::event::{MenuEvent, TrayEvent};
use crate::logging::targets;
use crate::pump::EventPump;

/// Everything a host needs to run trays against one platform backend.
///
/// A process normally has one context, created at startup and initialized
/// on the thread that will own the trays. Polling is safe from any thread.
///
/// ```
/// use horizon_tray_core::{MockBackend, TrayContext};
///
/// let context = TrayContext::new(MockBackend::new());
/// assert_eq!(context.update(), 0);
/// context.initialize().unwrap();
/// assert!(context.is_initialized());
/// assert!(context.poll_menu_event().is_none());
/// ```
pub struct TrayContext {
    backend: Arc<dyn PlatformBackend>,
    pump: EventPump,
    sink: EventSink,
    config: ContextConfig,
}

impl TrayContext {
    /// Create a context with the default configuration.
    pub fn new(backend: impl PlatformBackend + 'static) -> Self {
        Self::with_config(backend, ContextConfig::default())
    }

    /// Create a context with an explicit configuration.
    pub fn with_config(backend: impl PlatformBackend + 'static, config: ContextConfig) -> Self {
        Self::from_backend(Arc::new(backend), config)
    }

    /// Create a context from a shared backend.
    pub fn from_backend(backend: Arc<dyn PlatformBackend>, config: ContextConfig) -> Self {
        let config = config.normalized();
        let bridge = EventBridge::from_config(&config);
        tracing::debug!(
            target: targets::CORE,
            backend = backend.name(),
            tray_capacity = config.tray_queue_capacity,
            menu_capacity = config.menu_queue_capacity,
            "created tray context"
        );
        Self {
            pump: EventPump::new(Arc::clone(&backend), config.pump_budget),
            backend,
            sink: EventSink::new(bridge),
            config,
        }
    }

    /// Initialize the platform. See [`EventPump::initialize`].
    pub fn initialize(&self) -> Result<()> {
        self.pump.initialize(&self.sink)
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.pump.is_initialized()
    }

    /// Run one bounded pump tick. See [`EventPump::update`].
    pub fn update(&self) -> usize {
        self.pump.update()
    }

    /// Take the oldest pending tray event.
    pub fn poll_tray_event(&self) -> Option<TrayEvent> {
        self.sink.bridge().poll_tray()
    }

    /// Take the oldest pending menu event.
    ///
    /// The owning menu's registry already reflects any checked state the
    /// event reports; it was recorded when the platform emitted the event.
    pub fn poll_menu_event(&self) -> Option<MenuEvent> {
        self.sink.bridge().poll_menu()
    }

    /// Take every pending tray event, oldest first.
    pub fn drain_tray_events(&self) -> Vec<TrayEvent> {
        self.sink.bridge().drain_tray()
    }

    /// Take every pending menu event, oldest first.
    pub fn drain_menu_events(&self) -> Vec<MenuEvent> {
        self.sink.bridge().drain_menu()
    }

    /// The event queues.
    pub fn bridge(&self) -> &EventBridge {
        self.sink.bridge()
    }

    /// The message pump.
    pub fn pump(&self) -> &EventPump {
        &self.pump
    }

    /// Name of the platform backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// The configuration the context was created with.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub(crate) fn backend(&self) -> &dyn PlatformBackend {
        self.backend.as_ref()
    }

    pub(crate) fn sink(&self) -> &EventSink {
        &self.sink
    }
}

impl std::fmt::Debug for TrayContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayContext")
            .field("backend", &self.backend.name())
            .field("pump", &self.pump)
            .field("bridge", self.sink.bridge())
            .field("config", &self.config)
            .finish()
    }
}
