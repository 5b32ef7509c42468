//! Runtime state of a menu tree, indexed by identifier.
//!
//! The tree built with the builders fixes the *shape* of a menu. Everything
//! that may change afterwards (labels, checkmarks, enabled flags) lives here.
//! Once the tree has been realized each entry also holds a weak reference to
//! its native peer, and every mutation is written to both.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::id::MenuId;
use super::node::{MenuNode, check_disjoint};
use crate::backend::MenuPeer;
use crate::error::{Result, StateError};
use crate::logging::targets;

/// The variant of a registered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A plain item.
    Item,
    /// A checkable item.
    Check,
    /// An item with an icon.
    Icon,
    /// A submenu.
    Submenu,
}

/// A copy of one entry's runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    /// Variant of the node.
    pub kind: EntryKind,
    /// Current label.
    pub text: String,
    /// Current checked state (`Some` only for check items).
    pub checked: Option<bool>,
    /// Current enabled state.
    pub enabled: bool,
}

struct Entry {
    state: EntrySnapshot,
    peer: Option<Weak<dyn MenuPeer>>,
}

#[derive(Default)]
struct RegistryInner {
    entries: HashMap<MenuId, Entry>,
    order: Vec<MenuId>,
}

/// Index from identifier to runtime menu state.
///
/// `MenuRegistry` is a cheap, cloneable handle; clones share the same index.
/// Each operation takes the lock for its own duration only.
#[derive(Clone, Default)]
pub struct MenuRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl MenuRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every identified node of `tree`, depth-first, parents before
    /// children.
    ///
    /// Registration is all-or-nothing: if any identifier collides (with an
    /// existing entry or within `tree`) nothing is inserted.
    ///
    /// Returns the number of inserted entries.
    pub fn register(&self, tree: &[MenuNode]) -> Result<usize> {
        // Walk the tree before locking the registry; submenus take their own locks.
        let mut pending = Vec::new();
        collect_entries(tree, &mut pending);

        let mut inner = self.inner.write();
        let incoming: Vec<MenuId> = pending.iter().map(|(id, _)| id.clone()).collect();
        check_disjoint(&inner.order, &incoming)?;

        let count = pending.len();
        for (id, state) in pending {
            inner.order.push(id.clone());
            inner.entries.insert(id, Entry { state, peer: None });
        }
        tracing::debug!(target: targets::MENU, count, total = inner.order.len(), "registered menu nodes");
        Ok(count)
    }

    /// Change the label of an item, check item, icon item or submenu.
    pub fn set_text(&self, id: &str, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let peer = self.update(id, |state| {
            state.text = text.clone();
            Ok(())
        })?;
        if let Some(peer) = peer {
            peer.set_text(&text);
        }
        Ok(())
    }

    /// Set the checked state of a check item.
    pub fn set_checked(&self, id: &str, checked: bool) -> Result<()> {
        let peer = self.update(id, |state| {
            state.checked = Some(checked);
            Ok(())
        })?;
        if let Some(peer) = peer {
            peer.set_checked(checked);
        }
        Ok(())
    }

    /// Flip the checked state of a check item, returning the new state.
    pub fn toggle_check(&self, id: &str) -> Result<bool> {
        let mut new_state = false;
        let peer = self.update(id, |state| {
            new_state = !state.checked.unwrap_or(false);
            state.checked = Some(new_state);
            Ok(())
        })?;
        if let Some(peer) = peer {
            peer.set_checked(new_state);
        }
        Ok(new_state)
    }

    /// Whether a check item is currently checked.
    pub fn is_checked(&self, id: &str) -> Result<bool> {
        let inner = self.inner.read();
        let entry = inner
            .entries
            .get(id)
            .ok_or_else(|| StateError::NotFound(MenuId::new(id)))?;
        entry
            .state
            .checked
            .ok_or_else(|| StateError::NotCheckable(MenuId::new(id)).into())
    }

    /// Enable or disable an item.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let peer = self.update(id, |state| {
            state.enabled = enabled;
            Ok(())
        })?;
        if let Some(peer) = peer {
            peer.set_enabled(enabled);
        }
        Ok(())
    }

    /// Whether an item is currently enabled.
    pub fn is_enabled(&self, id: &str) -> Result<bool> {
        self.snapshot(id)
            .map(|state| state.enabled)
            .ok_or_else(|| StateError::NotFound(MenuId::new(id)).into())
    }

    /// The current label of an item.
    pub fn text(&self, id: &str) -> Result<String> {
        self.snapshot(id)
            .map(|state| state.text)
            .ok_or_else(|| StateError::NotFound(MenuId::new(id)).into())
    }

    /// The current label of an item, for diagnostics.
    pub fn label(&self, id: &str) -> Option<String> {
        self.inner.read().entries.get(id).map(|e| e.state.text.clone())
    }

    /// The variant of a registered node.
    pub fn kind(&self, id: &str) -> Option<EntryKind> {
        self.inner.read().entries.get(id).map(|e| e.state.kind)
    }

    /// A copy of an entry's current state.
    pub fn snapshot(&self, id: &str) -> Option<EntrySnapshot> {
        self.inner.read().entries.get(id).map(|e| e.state.clone())
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().entries.contains_key(id)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().order.is_empty()
    }

    /// Registered identifiers, in registration order.
    pub fn ids(&self) -> Vec<MenuId> {
        self.inner.read().order.clone()
    }

    /// Whether `id` currently has a live native peer.
    pub fn has_live_peer(&self, id: &str) -> bool {
        self.inner
            .read()
            .entries
            .get(id)
            .and_then(|e| e.peer.as_ref())
            .is_some_and(|peer| peer.strong_count() > 0)
    }

    /// Attach weak references to realized native peers.
    pub(crate) fn attach_peers(&self, peers: &HashMap<MenuId, Arc<dyn MenuPeer>>) {
        let mut inner = self.inner.write();
        let mut attached = 0usize;
        for (id, peer) in peers {
            if let Some(entry) = inner.entries.get_mut(id) {
                entry.peer = Some(Arc::downgrade(peer));
                attached += 1;
            } else {
                tracing::warn!(target: targets::MENU, %id, "backend returned a peer for an unregistered node");
            }
        }
        tracing::debug!(target: targets::MENU, attached, "attached native peers");
    }

    /// Drop all peer references.
    pub(crate) fn detach_peers(&self) {
        for entry in self.inner.write().entries.values_mut() {
            entry.peer = None;
        }
    }

    /// Record a checked state that the OS already applied to the peer.
    pub(crate) fn record_checked(&self, id: &str, checked: bool) {
        let mut inner = self.inner.write();
        match inner.entries.get_mut(id) {
            Some(entry) if entry.state.checked.is_some() => entry.state.checked = Some(checked),
            _ => {}
        }
    }

    pub(crate) fn ptr_eq(&self, other: &MenuRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Apply `f` to the entry under the lock, validate checkability for
    /// checked-state changes, and return the live peer to write to afterwards.
    fn update<F>(&self, id: &str, f: F) -> Result<Option<Arc<dyn MenuPeer>>>
    where
        F: FnOnce(&mut EntrySnapshot) -> Result<()>,
    {
        let mut inner = self.inner.write();
        let entry = inner
            .entries
            .get_mut(id)
            .ok_or_else(|| StateError::NotFound(MenuId::new(id)))?;
        let was_checkable = entry.state.checked.is_some();
        let mut next = entry.state.clone();
        f(&mut next)?;
        if !was_checkable && next.checked.is_some() {
            return Err(StateError::NotCheckable(MenuId::new(id)).into());
        }
        entry.state = next;
        Ok(entry.peer.as_ref().and_then(Weak::upgrade))
    }
}

impl std::fmt::Debug for MenuRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("MenuRegistry")
            .field("entries", &inner.order)
            .finish()
    }
}

fn collect_entries(nodes: &[MenuNode], out: &mut Vec<(MenuId, EntrySnapshot)>) {
    for node in nodes {
        match node {
            MenuNode::Item(item) => out.push((
                item.id.clone(),
                EntrySnapshot {
                    kind: EntryKind::Item,
                    text: item.text.clone(),
                    checked: None,
                    enabled: item.enabled,
                },
            )),
            MenuNode::Check(item) => out.push((
                item.id.clone(),
                EntrySnapshot {
                    kind: EntryKind::Check,
                    text: item.text.clone(),
                    checked: Some(item.checked),
                    enabled: item.enabled,
                },
            )),
            MenuNode::Icon(item) => out.push((
                item.id.clone(),
                EntrySnapshot {
                    kind: EntryKind::Icon,
                    text: item.text.clone(),
                    checked: None,
                    enabled: item.enabled,
                },
            )),
            MenuNode::Predefined(_) => {}
            MenuNode::Submenu(submenu) => {
                let state = submenu.state();
                out.push((
                    state.id.clone(),
                    EntrySnapshot {
                        kind: EntryKind::Submenu,
                        text: state.text.clone(),
                        checked: None,
                        enabled: state.enabled,
                    },
                ));
                collect_entries(&state.children, out);
            }
        }
    }
}
