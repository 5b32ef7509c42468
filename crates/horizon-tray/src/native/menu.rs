//! Rendering resolved menu trees into `muda` menus.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_tray_core::menu::{AboutMetadata, MenuId, PredefinedKind, PredefinedMenuItem};
use horizon_tray_core::{MenuPeer, PlatformError, ResolvedNode, Result};
use tray_icon::menu::{self as muda, IsMenuItem};

use super::convert;

/// A native menu item used as a runtime peer.
///
/// `muda` items are reference-counted UI objects that must only be touched
/// on the thread that created them (the thread that initialized the tray
/// context). The engine calls peers from the registry's mutators, which
/// hosts invoke on that thread.
pub(crate) enum NativePeer {
    Item(muda::MenuItem),
    Check(muda::CheckMenuItem),
    Icon(muda::IconMenuItem),
    Submenu(muda::Submenu),
}

// SAFETY: see the type docs; peers are only used on the UI thread.
unsafe impl Send for NativePeer {}
unsafe impl Sync for NativePeer {}

impl MenuPeer for NativePeer {
    fn set_text(&self, text: &str) {
        match self {
            Self::Item(item) => item.set_text(text),
            Self::Check(item) => item.set_text(text),
            Self::Icon(item) => item.set_text(text),
            Self::Submenu(item) => item.set_text(text),
        }
    }

    fn set_checked(&self, checked: bool) {
        if let Self::Check(item) = self {
            item.set_checked(checked);
        }
    }

    fn set_enabled(&self, enabled: bool) {
        match self {
            Self::Item(item) => item.set_enabled(enabled),
            Self::Check(item) => item.set_enabled(enabled),
            Self::Icon(item) => item.set_enabled(enabled),
            Self::Submenu(item) => item.set_enabled(enabled),
        }
    }
}

/// A check item shared with the menu event handler so activations can report
/// the checkmark the platform just toggled.
#[derive(Clone)]
pub(crate) struct CheckHandle(muda::CheckMenuItem);

// SAFETY: only read from the menu event handler, which `muda` invokes on the
// UI thread that owns the item.
unsafe impl Send for CheckHandle {}
unsafe impl Sync for CheckHandle {}

impl CheckHandle {
    pub(crate) fn new(item: muda::CheckMenuItem) -> Self {
        Self(item)
    }

    pub(crate) fn is_checked(&self) -> bool {
        self.0.is_checked()
    }
}

/// Output of [`build_menu`].
pub(crate) struct BuiltMenu {
    pub(crate) menu: muda::Menu,
    pub(crate) peers: HashMap<MenuId, Arc<dyn MenuPeer>>,
    pub(crate) checks: Vec<(String, CheckHandle)>,
}

/// Build a context menu from a resolved tree.
pub(crate) fn build_menu(nodes: &[ResolvedNode]) -> Result<BuiltMenu> {
    let mut peers = HashMap::new();
    let mut checks = Vec::new();
    let items = build_items(nodes, &mut peers, &mut checks)?;

    let menu = muda::Menu::new();
    menu.append_items(&as_refs(&items))
        .map_err(|e| PlatformError::create_tray(format!("failed to build menu: {e}")))?;
    Ok(BuiltMenu {
        menu,
        peers,
        checks,
    })
}

fn as_refs(items: &[Box<dyn IsMenuItem>]) -> Vec<&dyn IsMenuItem> {
    items.iter().map(AsRef::as_ref).collect()
}

fn build_items(
    nodes: &[ResolvedNode],
    peers: &mut HashMap<MenuId, Arc<dyn MenuPeer>>,
    checks: &mut Vec<(String, CheckHandle)>,
) -> Result<Vec<Box<dyn IsMenuItem>>> {
    let mut items: Vec<Box<dyn IsMenuItem>> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            ResolvedNode::Item { id, text, enabled } => {
                let item = muda::MenuItem::with_id(id.as_str(), text, *enabled, None);
                peers.insert(id.clone(), Arc::new(NativePeer::Item(item.clone())));
                items.push(Box::new(item));
            }
            ResolvedNode::Check {
                id,
                text,
                checked,
                enabled,
            } => {
                let item =
                    muda::CheckMenuItem::with_id(id.as_str(), text, *enabled, *checked, None);
                checks.push((id.as_str().to_owned(), CheckHandle::new(item.clone())));
                peers.insert(id.clone(), Arc::new(NativePeer::Check(item.clone())));
                items.push(Box::new(item));
            }
            ResolvedNode::Icon {
                id,
                text,
                enabled,
                icon,
            } => {
                let icon = convert::menu_icon(icon)?;
                let item =
                    muda::IconMenuItem::with_id(id.as_str(), text, *enabled, Some(icon), None);
                peers.insert(id.clone(), Arc::new(NativePeer::Icon(item.clone())));
                items.push(Box::new(item));
            }
            ResolvedNode::Predefined(item) => items.push(Box::new(predefined(item))),
            ResolvedNode::Submenu {
                id,
                text,
                enabled,
                children,
            } => {
                let submenu = muda::Submenu::with_id(id.as_str(), text, *enabled);
                let children = build_items(children, peers, checks)?;
                submenu.append_items(&as_refs(&children)).map_err(|e| {
                    PlatformError::create_tray(format!("failed to build submenu '{id}': {e}"))
                })?;
                peers.insert(id.clone(), Arc::new(NativePeer::Submenu(submenu.clone())));
                items.push(Box::new(submenu));
            }
        }
    }
    Ok(items)
}

fn predefined(item: &PredefinedMenuItem) -> muda::PredefinedMenuItem {
    let text = item.text();
    match item.kind() {
        PredefinedKind::Separator => muda::PredefinedMenuItem::separator(),
        PredefinedKind::Copy => muda::PredefinedMenuItem::copy(text),
        PredefinedKind::Cut => muda::PredefinedMenuItem::cut(text),
        PredefinedKind::Paste => muda::PredefinedMenuItem::paste(text),
        PredefinedKind::SelectAll => muda::PredefinedMenuItem::select_all(text),
        PredefinedKind::Undo => muda::PredefinedMenuItem::undo(text),
        PredefinedKind::Redo => muda::PredefinedMenuItem::redo(text),
        PredefinedKind::Minimize => muda::PredefinedMenuItem::minimize(text),
        PredefinedKind::Maximize => muda::PredefinedMenuItem::maximize(text),
        PredefinedKind::Fullscreen => muda::PredefinedMenuItem::fullscreen(text),
        PredefinedKind::Hide => muda::PredefinedMenuItem::hide(text),
        PredefinedKind::HideOthers => muda::PredefinedMenuItem::hide_others(text),
        PredefinedKind::ShowAll => muda::PredefinedMenuItem::show_all(text),
        PredefinedKind::CloseWindow => muda::PredefinedMenuItem::close_window(text),
        PredefinedKind::Quit => muda::PredefinedMenuItem::quit(text),
        PredefinedKind::About(metadata) => {
            muda::PredefinedMenuItem::about(text, metadata.as_ref().map(about_metadata))
        }
    }
}

fn about_metadata(metadata: &AboutMetadata) -> muda::AboutMetadata {
    muda::AboutMetadata {
        name: metadata.name.clone(),
        version: metadata.version.clone(),
        copyright: metadata.copyright.clone(),
        authors: metadata.authors.clone(),
        website: metadata.website.clone(),
        website_label: metadata.website_label.clone(),
        comments: metadata.comments.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_tray_core::menu::AboutMetadataBuilder;

    #[test]
    fn test_about_metadata_fields() {
        let metadata = AboutMetadataBuilder::new()
            .with_name("Horizon")
            .with_version("1.2.3")
            .with_authors(["Ada"])
            .build();
        let native = about_metadata(&metadata);
        assert_eq!(native.name.as_deref(), Some("Horizon"));
        assert_eq!(native.version.as_deref(), Some("1.2.3"));
        assert_eq!(native.authors, Some(vec!["Ada".to_owned()]));
        assert!(native.license.is_none());
    }
}
