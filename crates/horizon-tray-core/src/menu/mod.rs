//! Menu trees for tray icons.
//!
//! A [`Menu`] is the root of a tree of [`MenuNode`]s. The tree's shape is
//! fixed by appending nodes before the menu is attached to a tray; after that
//! the shape is frozen and only runtime state (labels, checkmarks, enabled
//! flags) can change, through the menu's [`MenuRegistry`].
//!
//! ```
//! use horizon_tray_core::menu::{CheckMenuItemBuilder, Menu, MenuItemBuilder, PredefinedMenuItem};
//!
//! let menu = Menu::new();
//! menu.append_menu_item(&MenuItemBuilder::new().with_id("hello").with_text("Hello").build().unwrap())
//!     .unwrap();
//! menu.append_check_menu_item(
//!     &CheckMenuItemBuilder::new().with_id("notif").with_text("Notify").build().unwrap(),
//! )
//! .unwrap();
//! menu.append_predefined_menu_item(&PredefinedMenuItem::separator()).unwrap();
//!
//! menu.set_checked("notif", true).unwrap();
//! assert!(menu.is_checked("notif").unwrap());
//! ```

mod builder;
mod id;
mod node;
mod predefined;
mod registry;

pub use builder::{CheckMenuItemBuilder, IconMenuItemBuilder, MenuItemBuilder, SubmenuBuilder};
pub use id::{MenuId, TrayId};
pub use node::{CheckMenuItem, IconMenuItem, MenuItem, MenuNode, Submenu};
pub use predefined::{AboutMetadata, AboutMetadataBuilder, PredefinedKind, PredefinedMenuItem};
pub use registry::{EntryKind, EntrySnapshot, MenuRegistry};

use std::sync::Arc;

use parking_lot::RwLock;

use crate::backend::ResolvedNode;
use crate::error::{Result, StateError};
use crate::logging::targets;

struct MenuInner {
    children: RwLock<Vec<MenuNode>>,
    realized: RwLock<bool>,
    registry: MenuRegistry,
}

/// The root of a menu tree.
///
/// `Menu` is a shared handle; clones refer to the same menu. Every appended
/// node is registered in the menu's registry immediately, so runtime
/// mutators work before the menu is attached to a tray.
#[derive(Clone)]
pub struct Menu {
    inner: Arc<MenuInner>,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MenuInner {
                children: RwLock::new(Vec::new()),
                realized: RwLock::new(false),
                registry: MenuRegistry::new(),
            }),
        }
    }

    /// Create a menu from a sequence of nodes, failing on the first rejected
    /// append.
    pub fn with_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<MenuNode>,
    {
        let menu = Self::new();
        for item in items {
            menu.append(item)?;
        }
        Ok(menu)
    }

    // ========================================================================
    // Tree construction
    // ========================================================================

    /// Append a node at the end of the menu.
    ///
    /// # Errors
    ///
    /// - [`StateError::TreeAlreadyRealized`] once the menu is attached to a tray
    /// - [`ValidationError::DuplicateIdentifier`](crate::ValidationError::DuplicateIdentifier)
    ///   if any identifier in the node's subtree is already in this menu
    /// - [`ValidationError::AlreadyAttached`](crate::ValidationError::AlreadyAttached)
    ///   if the node contains a submenu that already belongs to a menu; a
    ///   realized one fails with [`StateError::TreeAlreadyRealized`]
    pub fn append(&self, node: impl Into<MenuNode>) -> Result<()> {
        let node = node.into();
        let realized = self.inner.realized.read();
        if *realized {
            return Err(StateError::TreeAlreadyRealized.into());
        }
        let mut children = self.inner.children.write();
        node::check_detached(std::slice::from_ref(&node))?;
        self.inner
            .registry
            .register(std::slice::from_ref(&node))?;
        node.attach_registry(&self.inner.registry);
        tracing::trace!(target: targets::MENU, kind = node.kind_name(), id = ?node.id(), "appended menu node");
        children.push(node);
        Ok(())
    }

    /// Append a plain item.
    pub fn append_menu_item(&self, item: &MenuItem) -> Result<()> {
        self.append(item.clone())
    }

    /// Append a check item.
    pub fn append_check_menu_item(&self, item: &CheckMenuItem) -> Result<()> {
        self.append(item.clone())
    }

    /// Append an icon item.
    pub fn append_icon_menu_item(&self, item: &IconMenuItem) -> Result<()> {
        self.append(item.clone())
    }

    /// Append a submenu. The caller keeps its handle and may continue to
    /// append to it until the menu is realized.
    pub fn append_submenu(&self, submenu: &Submenu) -> Result<()> {
        self.append(submenu.clone())
    }

    /// Append a predefined item such as a separator.
    pub fn append_predefined_menu_item(&self, item: &PredefinedMenuItem) -> Result<()> {
        self.append(item.clone())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// A snapshot of the top-level nodes, in insertion order.
    pub fn items(&self) -> Vec<MenuNode> {
        self.inner.children.read().clone()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.inner.children.read().len()
    }

    /// Whether the menu has no top-level nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.children.read().is_empty()
    }

    /// Find a node anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<MenuNode> {
        find_in(&self.inner.children.read(), id)
    }

    /// Whether the menu is attached to a tray.
    pub fn is_realized(&self) -> bool {
        *self.inner.realized.read()
    }

    /// The registry holding this menu's runtime state.
    pub fn registry(&self) -> &MenuRegistry {
        &self.inner.registry
    }

    // ========================================================================
    // Runtime state
    // ========================================================================

    /// Change the label of an item or submenu.
    pub fn set_text(&self, id: &str, text: impl Into<String>) -> Result<()> {
        self.inner.registry.set_text(id, text)
    }

    /// Label of an item or submenu.
    pub fn text(&self, id: &str) -> Result<String> {
        self.inner.registry.text(id)
    }

    /// Set the checked state of a check item.
    pub fn set_checked(&self, id: &str, checked: bool) -> Result<()> {
        self.inner.registry.set_checked(id, checked)
    }

    /// Whether a check item is checked.
    pub fn is_checked(&self, id: &str) -> Result<bool> {
        self.inner.registry.is_checked(id)
    }

    /// Flip a check item, returning its new state.
    pub fn toggle_check(&self, id: &str) -> Result<bool> {
        self.inner.registry.toggle_check(id)
    }

    /// Enable or disable an item or submenu.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        self.inner.registry.set_enabled(id, enabled)
    }

    /// Whether an item or submenu is enabled.
    pub fn is_enabled(&self, id: &str) -> Result<bool> {
        self.inner.registry.is_enabled(id)
    }

    // ========================================================================
    // Realization
    // ========================================================================

    /// Freeze the tree for realization. Fails if another tray already holds it.
    pub(crate) fn claim(&self) -> Result<()> {
        let mut realized = self.inner.realized.write();
        if *realized {
            return Err(StateError::TreeAlreadyRealized.into());
        }
        *realized = true;
        for node in self.inner.children.read().iter() {
            node.mark_realized();
        }
        Ok(())
    }

    /// Undo [`claim`](Self::claim) after a failed realization.
    pub(crate) fn release(&self) {
        *self.inner.realized.write() = false;
        for node in self.inner.children.read().iter() {
            node.clear_realized();
        }
    }

    /// Render the tree with the registry's current state.
    pub(crate) fn resolve(&self) -> Vec<ResolvedNode> {
        resolve_nodes(&self.inner.children.read(), &self.inner.registry)
    }
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("children", &*self.inner.children.read())
            .field("realized", &self.is_realized())
            .finish()
    }
}

fn find_in(nodes: &[MenuNode], id: &str) -> Option<MenuNode> {
    for node in nodes {
        if node.id().is_some_and(|node_id| node_id == id) {
            return Some(node.clone());
        }
        if let MenuNode::Submenu(submenu) = node {
            if let Some(found) = find_in(&submenu.state().children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn resolve_nodes(nodes: &[MenuNode], registry: &MenuRegistry) -> Vec<ResolvedNode> {
    nodes
        .iter()
        .map(|node| match node {
            MenuNode::Item(item) => {
                let state = registry.snapshot(item.id.as_str());
                ResolvedNode::Item {
                    id: item.id.clone(),
                    text: state.as_ref().map_or_else(|| item.text.clone(), |s| s.text.clone()),
                    enabled: state.map_or(item.enabled, |s| s.enabled),
                }
            }
            MenuNode::Check(item) => {
                let state = registry.snapshot(item.id.as_str());
                ResolvedNode::Check {
                    id: item.id.clone(),
                    text: state.as_ref().map_or_else(|| item.text.clone(), |s| s.text.clone()),
                    checked: state
                        .as_ref()
                        .and_then(|s| s.checked)
                        .unwrap_or(item.checked),
                    enabled: state.map_or(item.enabled, |s| s.enabled),
                }
            }
            MenuNode::Icon(item) => {
                let state = registry.snapshot(item.id.as_str());
                ResolvedNode::Icon {
                    id: item.id.clone(),
                    text: state.as_ref().map_or_else(|| item.text.clone(), |s| s.text.clone()),
                    enabled: state.map_or(item.enabled, |s| s.enabled),
                    icon: item.icon.clone(),
                }
            }
            MenuNode::Predefined(item) => ResolvedNode::Predefined(item.clone()),
            MenuNode::Submenu(submenu) => {
                let sub = submenu.state();
                let state = registry.snapshot(sub.id.as_str());
                ResolvedNode::Submenu {
                    id: sub.id.clone(),
                    text: state.as_ref().map_or_else(|| sub.text.clone(), |s| s.text.clone()),
                    enabled: state.map_or(sub.enabled, |s| s.enabled),
                    children: resolve_nodes(&sub.children, registry),
                }
            }
        })
        .collect()
}
