//! Configuration for the tray context.

use serde::Deserialize;

/// Default capacity of each event channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default maximum number of OS messages dispatched per `update()` tick.
pub const DEFAULT_PUMP_BUDGET: usize = 64;

/// Configuration for creating a [`TrayContext`](crate::TrayContext).
///
/// Deserializable so hosts can embed it in their own settings files; missing
/// fields fall back to the defaults.
///
/// ```
/// use horizon_tray_core::ContextConfig;
///
/// let config = ContextConfig::default()
///     .tray_queue_capacity(32)
///     .pump_budget(16);
/// assert_eq!(config.tray_queue_capacity, 32);
/// assert_eq!(config.menu_queue_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Capacity of the tray-event channel. When full, the oldest event is dropped.
    pub tray_queue_capacity: usize,
    /// Capacity of the menu-event channel. When full, the oldest event is dropped.
    pub menu_queue_capacity: usize,
    /// Maximum OS messages dispatched by one `update()` call.
    pub pump_budget: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            tray_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            menu_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pump_budget: DEFAULT_PUMP_BUDGET,
        }
    }
}

impl ContextConfig {
    /// Set the tray-event channel capacity (clamped to at least 1).
    pub fn tray_queue_capacity(mut self, capacity: usize) -> Self {
        self.tray_queue_capacity = capacity.max(1);
        self
    }

    /// Set the menu-event channel capacity (clamped to at least 1).
    pub fn menu_queue_capacity(mut self, capacity: usize) -> Self {
        self.menu_queue_capacity = capacity.max(1);
        self
    }

    /// Set the per-tick pump budget (clamped to at least 1).
    pub fn pump_budget(mut self, budget: usize) -> Self {
        self.pump_budget = budget.max(1);
        self
    }

    /// Return a copy with every value clamped into its valid range.
    ///
    /// Deserialized configs bypass the setters, so the context normalizes
    /// them before use.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            tray_queue_capacity: self.tray_queue_capacity.max(1),
            menu_queue_capacity: self.menu_queue_capacity.max(1),
            pump_budget: self.pump_budget.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert_eq!(config.tray_queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.menu_queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.pump_budget, DEFAULT_PUMP_BUDGET);
    }

    #[test]
    fn test_setters_clamp_zero() {
        let config = ContextConfig::default()
            .tray_queue_capacity(0)
            .menu_queue_capacity(0)
            .pump_budget(0);
        assert_eq!(config.tray_queue_capacity, 1);
        assert_eq!(config.menu_queue_capacity, 1);
        assert_eq!(config.pump_budget, 1);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: ContextConfig = toml::from_str("menu_queue_capacity = 8").unwrap();
        assert_eq!(config.menu_queue_capacity, 8);
        assert_eq!(config.tray_queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_normalized_fixes_deserialized_zero() {
        let config: ContextConfig = toml::from_str("pump_budget = 0").unwrap();
        assert_eq!(config.pump_budget, 0);
        assert_eq!(config.normalized().pump_budget, 1);
    }
}
