//! The menu tree: items, check items, icon items, predefined items and submenus.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use super::id::MenuId;
use super::predefined::PredefinedMenuItem;
use super::registry::MenuRegistry;
use crate::error::{Result, StateError, ValidationError};
use crate::icon::Icon;

/// A plain, clickable menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub(crate) id: MenuId,
    pub(crate) text: String,
    pub(crate) enabled: bool,
}

impl MenuItem {
    /// The item's identifier.
    pub fn id(&self) -> &MenuId {
        &self.id
    }

    /// The initial label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The initial enabled state.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A menu item with a checkmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMenuItem {
    pub(crate) id: MenuId,
    pub(crate) text: String,
    pub(crate) checked: bool,
    pub(crate) enabled: bool,
}

impl CheckMenuItem {
    /// The item's identifier.
    pub fn id(&self) -> &MenuId {
        &self.id
    }

    /// The initial label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The initial checked state.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// The initial enabled state.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A menu item showing an icon next to its label.
#[derive(Debug, Clone)]
pub struct IconMenuItem {
    pub(crate) id: MenuId,
    pub(crate) text: String,
    pub(crate) enabled: bool,
    pub(crate) icon: Icon,
}

impl IconMenuItem {
    /// The item's identifier.
    pub fn id(&self) -> &MenuId {
        &self.id
    }

    /// The initial label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The initial enabled state.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The item's icon.
    pub fn icon(&self) -> &Icon {
        &self.icon
    }
}

/// Internal state of a [`Submenu`].
pub(crate) struct SubmenuState {
    pub(crate) id: MenuId,
    pub(crate) text: String,
    pub(crate) enabled: bool,
    pub(crate) children: Vec<MenuNode>,
    pub(crate) realized: bool,
    pub(crate) registry: Option<MenuRegistry>,
}

/// A nested menu.
///
/// `Submenu` is a shared handle: clones refer to the same submenu, so a host
/// can keep a handle after appending it to a [`Menu`](super::Menu). The
/// submenu exclusively owns its ordered children. Once the tree it belongs to
/// has been realized against the OS, appending fails with
/// [`StateError::TreeAlreadyRealized`].
#[derive(Clone)]
pub struct Submenu {
    inner: Arc<RwLock<SubmenuState>>,
}

impl Submenu {
    pub(crate) fn new(id: MenuId, text: String, enabled: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SubmenuState {
                id,
                text,
                enabled,
                children: Vec::new(),
                realized: false,
                registry: None,
            })),
        }
    }

    /// The submenu's identifier.
    pub fn id(&self) -> MenuId {
        self.inner.read().id.clone()
    }

    /// The initial label.
    pub fn text(&self) -> String {
        self.inner.read().text.clone()
    }

    /// The initial enabled state.
    pub fn is_enabled(&self) -> bool {
        self.inner.read().enabled
    }

    /// A snapshot of the children, in insertion order.
    pub fn items(&self) -> Vec<MenuNode> {
        self.inner.read().children.clone()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.inner.read().children.len()
    }

    /// Whether the submenu has no children.
    pub fn is_empty(&self) -> bool {
        self.inner.read().children.is_empty()
    }

    /// Whether the tree containing this submenu has been realized.
    pub fn is_realized(&self) -> bool {
        self.inner.read().realized
    }

    /// Append a node at the end of this submenu.
    ///
    /// # Errors
    ///
    /// - [`StateError::TreeAlreadyRealized`] once the tree has been realized
    /// - [`ValidationError::DuplicateIdentifier`] if the node's subtree shares
    ///   an identifier with this submenu's tree
    /// - [`ValidationError::AlreadyAttached`] if the node contains a submenu
    ///   that already belongs to a menu (or [`StateError::TreeAlreadyRealized`]
    ///   if that menu is realized)
    pub fn append(&self, node: impl Into<MenuNode>) -> Result<()> {
        let node = node.into();
        // Checked before locking: `node` may (illegally) contain `self`.
        check_detached(std::slice::from_ref(&node))?;
        let incoming = node.collect_ids();

        let mut state = self.inner.write();
        if state.realized {
            return Err(StateError::TreeAlreadyRealized.into());
        }
        if incoming.contains(&state.id) {
            return Err(ValidationError::DuplicateIdentifier(state.id.clone()).into());
        }
        let mut existing = Vec::new();
        collect_ids_into(&state.children, &mut existing);
        check_disjoint(&existing, &incoming)?;

        if let Some(registry) = &state.registry {
            registry.register(std::slice::from_ref(&node))?;
            node.attach_registry(registry);
        }
        state.children.push(node);
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

    /// Append a nested submenu.
    pub fn append_submenu(&self, submenu: &Submenu) -> Result<()> {
        self.append(submenu.clone())
    }

    /// Append a predefined item such as a separator.
    pub fn append_predefined_menu_item(&self, item: &PredefinedMenuItem) -> Result<()> {
        self.append(item.clone())
    }

    pub(crate) fn state(&self) -> RwLockReadGuard<'_, SubmenuState> {
        self.inner.read()
    }

    fn set_registry(&self, registry: &MenuRegistry) {
        let children = {
            let mut state = self.inner.write();
            state.registry = Some(registry.clone());
            state.children.clone()
        };
        for child in &children {
            child.attach_registry(registry);
        }
    }

    fn set_realized(&self, realized: bool) {
        let children = {
            let mut state = self.inner.write();
            state.realized = realized;
            state.children.clone()
        };
        for child in &children {
            if realized {
                child.mark_realized();
            } else {
                child.clear_realized();
            }
        }
    }
}

impl std::fmt::Debug for Submenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("Submenu")
            .field("id", &state.id)
            .field("text", &state.text)
            .field("enabled", &state.enabled)
            .field("children", &state.children)
            .field("realized", &state.realized)
            .finish()
    }
}

/// A node of the menu tree.
#[derive(Debug, Clone)]
pub enum MenuNode {
    /// A plain item.
    Item(MenuItem),
    /// A checkable item.
    Check(CheckMenuItem),
    /// An item with an icon.
    Icon(IconMenuItem),
    /// A separator or other OS-standard item.
    Predefined(PredefinedMenuItem),
    /// A nested menu.
    Submenu(Submenu),
}

impl MenuNode {
    /// The node's identifier. Predefined items have none.
    pub fn id(&self) -> Option<MenuId> {
        match self {
            Self::Item(item) => Some(item.id.clone()),
            Self::Check(item) => Some(item.id.clone()),
            Self::Icon(item) => Some(item.id.clone()),
            Self::Predefined(_) => None,
            Self::Submenu(submenu) => Some(submenu.id()),
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Item(_) => "item",
            Self::Check(_) => "check",
            Self::Icon(_) => "icon",
            Self::Predefined(item) => item.kind().name(),
            Self::Submenu(_) => "submenu",
        }
    }

    /// Identifiers of this node and its descendants, in pre-order.
    pub(crate) fn collect_ids(&self) -> Vec<MenuId> {
        let mut ids = Vec::new();
        collect_ids_into(std::slice::from_ref(self), &mut ids);
        ids
    }

    pub(crate) fn attach_registry(&self, registry: &MenuRegistry) {
        if let Self::Submenu(submenu) = self {
            submenu.set_registry(registry);
        }
    }

    pub(crate) fn mark_realized(&self) {
        if let Self::Submenu(submenu) = self {
            submenu.set_realized(true);
        }
    }

    pub(crate) fn clear_realized(&self) {
        if let Self::Submenu(submenu) = self {
            submenu.set_realized(false);
        }
    }
}

impl From<MenuItem> for MenuNode {
    fn from(item: MenuItem) -> Self {
        Self::Item(item)
    }
}

impl From<CheckMenuItem> for MenuNode {
    fn from(item: CheckMenuItem) -> Self {
        Self::Check(item)
    }
}

impl From<IconMenuItem> for MenuNode {
    fn from(item: IconMenuItem) -> Self {
        Self::Icon(item)
    }
}

impl From<PredefinedMenuItem> for MenuNode {
    fn from(item: PredefinedMenuItem) -> Self {
        Self::Predefined(item)
    }
}

impl From<Submenu> for MenuNode {
    fn from(submenu: Submenu) -> Self {
        Self::Submenu(submenu)
    }
}

pub(crate) fn collect_ids_into(nodes: &[MenuNode], out: &mut Vec<MenuId>) {
    for node in nodes {
        match node {
            MenuNode::Item(item) => out.push(item.id.clone()),
            MenuNode::Check(item) => out.push(item.id.clone()),
            MenuNode::Icon(item) => out.push(item.id.clone()),
            MenuNode::Predefined(_) => {}
            MenuNode::Submenu(submenu) => {
                let state = submenu.state();
                out.push(state.id.clone());
                collect_ids_into(&state.children, out);
            }
        }
    }
}

/// Fails if `nodes` contain a submenu that already belongs to a menu.
pub(crate) fn check_detached(nodes: &[MenuNode]) -> Result<()> {
    for node in nodes {
        if let MenuNode::Submenu(submenu) = node {
            let state = submenu.state();
            if state.realized {
                return Err(StateError::TreeAlreadyRealized.into());
            }
            if state.registry.is_some() {
                return Err(ValidationError::AlreadyAttached(state.id.clone()).into());
            }
            check_detached(&state.children)?;
        }
    }
    Ok(())
}

/// Fails with the first identifier that appears twice across both lists.
pub(crate) fn check_disjoint(existing: &[MenuId], incoming: &[MenuId]) -> Result<()> {
    let mut seen: HashSet<&MenuId> = existing.iter().collect();
    for id in incoming {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateIdentifier(id.clone()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::menu::{MenuItemBuilder, SubmenuBuilder};

    fn item(id: &str) -> MenuItem {
        MenuItemBuilder::new().with_id(id).with_text(id).build().unwrap()
    }

    fn submenu(id: &str) -> Submenu {
        SubmenuBuilder::new().with_id(id).with_text(id).build().unwrap()
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let sub = submenu("sub");
        sub.append_menu_item(&item("a")).unwrap();
        sub.append_predefined_menu_item(&PredefinedMenuItem::separator())
            .unwrap();
        sub.append_menu_item(&item("b")).unwrap();

        let kinds: Vec<_> = sub.items().iter().map(MenuNode::kind_name).collect();
        assert_eq!(kinds, vec!["item", "separator", "item"]);
        let ids: Vec<_> = sub.items().iter().filter_map(MenuNode::id).collect();
        assert_eq!(ids, vec![MenuId::new("a"), MenuId::new("b")]);
    }

    #[test]
    fn test_duplicate_in_unattached_submenu() {
        let sub = submenu("sub");
        sub.append_menu_item(&item("a")).unwrap();
        let err = sub.append_menu_item(&item("a")).unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::DuplicateIdentifier(MenuId::new("a")))
        );
        assert_eq!(sub.len(), 1);
    }

    #[test]
    fn test_self_append_is_rejected() {
        let sub = submenu("loop");
        let err = sub.append_submenu(&sub).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DuplicateIdentifier(_))
        ));
        assert!(sub.is_empty());
    }

    #[test]
    fn test_indirect_cycle_is_rejected() {
        let outer = submenu("outer");
        let inner = submenu("inner");
        outer.append_submenu(&inner).unwrap();
        assert!(inner.append_submenu(&outer).is_err());
        assert!(inner.is_empty());
    }

    #[test]
    fn test_collect_ids_pre_order() {
        let outer = submenu("outer");
        let inner = submenu("inner");
        inner.append_menu_item(&item("leaf")).unwrap();
        outer.append_menu_item(&item("first")).unwrap();
        outer.append_submenu(&inner).unwrap();
        outer.append_menu_item(&item("last")).unwrap();

        let ids = MenuNode::from(outer).collect_ids();
        let ids: Vec<_> = ids.iter().map(MenuId::as_str).collect();
        assert_eq!(ids, vec!["outer", "first", "inner", "leaf", "last"]);
    }

    #[test]
    fn test_realized_submenu_rejects_append() {
        let outer = submenu("outer");
        let inner = submenu("inner");
        outer.append_submenu(&inner).unwrap();
        MenuNode::from(outer.clone()).mark_realized();

        assert!(outer.is_realized());
        assert!(inner.is_realized());
        let err = inner.append_menu_item(&item("late")).unwrap_err();
        assert_eq!(err, Error::State(StateError::TreeAlreadyRealized));
    }

    #[test]
    fn test_attached_submenu_cannot_move() {
        let menu = crate::menu::Menu::new();
        let shared = submenu("shared");
        menu.append_submenu(&shared).unwrap();

        let other = submenu("other");
        assert_eq!(
            other.append_submenu(&shared),
            Err(Error::Validation(ValidationError::AlreadyAttached(
                MenuId::new("shared")
            )))
        );
        assert!(other.is_empty());
    }

    #[test]
    fn test_nested_attached_submenu_is_found() {
        let menu = crate::menu::Menu::new();
        let outer = submenu("outer");
        let inner = submenu("inner");
        outer.append_submenu(&inner).unwrap();
        menu.append_submenu(&outer).unwrap();

        let wrapper = submenu("wrapper");
        let err = wrapper.append_submenu(&inner).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::AlreadyAttached(_))
        ));
    }

    #[test]
    fn test_handles_share_state() {
        let sub = submenu("shared");
        let copy = sub.clone();
        copy.append_menu_item(&item("x")).unwrap();
        assert_eq!(sub.len(), 1);
        assert!(Arc::ptr_eq(&sub.inner, &copy.inner));
    }
}
