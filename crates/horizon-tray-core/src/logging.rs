//! Logging facilities for Horizon Tray.
//!
//! Horizon Tray uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Events are emitted under the targets in [`targets`], so a filter such as
//! `RUST_LOG=horizon_tray_core::bridge=trace` isolates queue traffic.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core engine target.
    pub const CORE: &str = "horizon_tray_core";
    /// Event queue target.
    pub const BRIDGE: &str = "horizon_tray_core::bridge";
    /// Message pump target.
    pub const PUMP: &str = "horizon_tray_core::pump";
    /// Menu tree and registry target.
    pub const MENU: &str = "horizon_tray_core::menu";
    /// Tray icon lifecycle target.
    pub const TRAY: &str = "horizon_tray_core::tray";
    /// Platform backend target.
    pub const BACKEND: &str = "horizon_tray_core::backend";
}
