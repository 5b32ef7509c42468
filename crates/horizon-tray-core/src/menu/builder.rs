//! Fluent builders for menu nodes.
//!
//! Builders accumulate properties and validate them in `build`. `build`
//! borrows the builder, so one builder can stamp out several nodes; each
//! build without an explicit id draws a fresh generated one.
//!
//! ```
//! use horizon_tray_core::menu::{CheckMenuItemBuilder, MenuItemBuilder};
//!
//! let hello = MenuItemBuilder::new().with_text("Hello").build().unwrap();
//! let notif = CheckMenuItemBuilder::new()
//!     .with_id("notif")
//!     .with_text("Notifications")
//!     .with_checked(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(hello.text(), "Hello");
//! assert!(notif.is_checked());
//! ```

use super::id::MenuId;
use super::node::{CheckMenuItem, IconMenuItem, MenuItem, Submenu};
use crate::error::{Result, ValidationError};
use crate::icon::Icon;

fn resolve_id(id: &Option<MenuId>) -> MenuId {
    id.clone().unwrap_or_else(MenuId::generate)
}

fn require_text(text: &Option<String>) -> Result<String> {
    text.clone()
        .ok_or_else(|| ValidationError::MissingField("text").into())
}

/// Builder for [`MenuItem`].
#[derive(Debug, Clone)]
pub struct MenuItemBuilder {
    id: Option<MenuId>,
    text: Option<String>,
    enabled: bool,
}

impl Default for MenuItemBuilder {
    fn default() -> Self {
        Self {
            id: None,
            text: None,
            enabled: true,
        }
    }
}

impl MenuItemBuilder {
    /// Create a builder with no text, a generated id and `enabled = true`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label. Required.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<MenuId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Build the item.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] if no text was set.
    pub fn build(&self) -> Result<MenuItem> {
        Ok(MenuItem {
            text: require_text(&self.text)?,
            id: resolve_id(&self.id),
            enabled: self.enabled,
        })
    }
}

/// Builder for [`CheckMenuItem`].
#[derive(Debug, Clone)]
pub struct CheckMenuItemBuilder {
    id: Option<MenuId>,
    text: Option<String>,
    checked: bool,
    enabled: bool,
}

impl Default for CheckMenuItemBuilder {
    fn default() -> Self {
        Self {
            id: None,
            text: None,
            checked: false,
            enabled: true,
        }
    }
}

impl CheckMenuItemBuilder {
    /// Create a builder with `checked = false` and `enabled = true`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label. Required.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<MenuId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial checked state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set the initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Build the check item.
    pub fn build(&self) -> Result<CheckMenuItem> {
        Ok(CheckMenuItem {
            text: require_text(&self.text)?,
            id: resolve_id(&self.id),
            checked: self.checked,
            enabled: self.enabled,
        })
    }
}

/// Builder for [`IconMenuItem`].
#[derive(Debug, Clone)]
pub struct IconMenuItemBuilder {
    id: Option<MenuId>,
    text: Option<String>,
    enabled: bool,
    icon: Option<Icon>,
}

impl Default for IconMenuItemBuilder {
    fn default() -> Self {
        Self {
            id: None,
            text: None,
            enabled: true,
            icon: None,
        }
    }
}

impl IconMenuItemBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label. Required.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<MenuId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the icon. Required.
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Build the icon item.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] if text or icon is missing.
    pub fn build(&self) -> Result<IconMenuItem> {
        let text = require_text(&self.text)?;
        let icon = self
            .icon
            .clone()
            .ok_or(ValidationError::MissingField("icon"))?;
        Ok(IconMenuItem {
            id: resolve_id(&self.id),
            text,
            enabled: self.enabled,
            icon,
        })
    }
}

/// Builder for [`Submenu`].
#[derive(Debug, Clone)]
pub struct SubmenuBuilder {
    id: Option<MenuId>,
    text: Option<String>,
    enabled: bool,
}

impl Default for SubmenuBuilder {
    fn default() -> Self {
        Self {
            id: None,
            text: None,
            enabled: true,
        }
    }
}

impl SubmenuBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label. Required.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<MenuId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Build an empty submenu. Children are added with
    /// [`Submenu::append`].
    pub fn build(&self) -> Result<Submenu> {
        let text = require_text(&self.text)?;
        Ok(Submenu::new(resolve_id(&self.id), text, self.enabled))
    }
}
