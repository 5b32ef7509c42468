//! Events delivered from the platform tray to the host application.
//!
//! Events are plain values. They are produced on whatever thread the platform
//! invokes its callbacks on, queued by the [`EventBridge`](crate::EventBridge),
//! and handed out exactly once by the poll functions.

use std::time::Instant;

use crate::menu::{MenuId, TrayId};

/// A mouse button involved in a tray interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button or wheel press.
    Middle,
}

/// Whether a click event reports a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButtonState {
    /// The button was released.
    Up,
    /// The button was pressed.
    Down,
}

/// A point in physical screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A screen rectangle, used for the tray icon's bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub position: Position,
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl Rect {
    /// Whether `point` lies inside the rectangle.
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.position.x + f64::from(self.width)
            && point.y < self.position.y + f64::from(self.height)
    }
}

/// The reason a tray icon was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivationReason {
    /// Not an activation (hover events).
    #[default]
    Unknown,
    /// Single left click.
    Click,
    /// Double left click.
    DoubleClick,
    /// Middle click.
    MiddleClick,
    /// Right click, usually opening the context menu.
    Context,
}

/// What happened to the tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEventKind {
    /// A mouse button was pressed or released over the icon.
    Click {
        /// Button involved.
        button: MouseButton,
        /// Press or release.
        state: MouseButtonState,
    },
    /// The icon was double-clicked. Not reported on every platform.
    DoubleClick {
        /// Button involved.
        button: MouseButton,
    },
    /// The cursor entered the icon bounds.
    Enter,
    /// The cursor moved over the icon.
    Move,
    /// The cursor left the icon bounds.
    Leave,
}

/// An interaction with a tray icon.
#[derive(Debug, Clone, PartialEq)]
pub struct TrayEvent {
    /// The tray that produced the event.
    pub tray_id: TrayId,
    /// What happened.
    pub kind: TrayEventKind,
    /// Cursor position.
    pub position: Position,
    /// Bounds of the tray icon.
    pub icon_rect: Rect,
    /// When the event was received from the platform.
    pub timestamp: Instant,
}

impl TrayEvent {
    /// Create an event stamped with the current time.
    pub fn new(tray_id: TrayId, kind: TrayEventKind, position: Position, icon_rect: Rect) -> Self {
        Self {
            tray_id,
            kind,
            position,
            icon_rect,
            timestamp: Instant::now(),
        }
    }

    /// Short lowercase name of the event kind.
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            TrayEventKind::Click { .. } => "click",
            TrayEventKind::DoubleClick { .. } => "double-click",
            TrayEventKind::Enter => "enter",
            TrayEventKind::Move => "move",
            TrayEventKind::Leave => "leave",
        }
    }

    /// Classify the event as an activation.
    ///
    /// Hover events, and presses of a click (as opposed to releases), map to
    /// [`ActivationReason::Unknown`].
    pub fn activation_reason(&self) -> ActivationReason {
        match self.kind {
            TrayEventKind::Click {
                button,
                state: MouseButtonState::Up,
            } => match button {
                MouseButton::Left => ActivationReason::Click,
                MouseButton::Right => ActivationReason::Context,
                MouseButton::Middle => ActivationReason::MiddleClick,
            },
            TrayEventKind::DoubleClick { button } => match button {
                MouseButton::Left => ActivationReason::DoubleClick,
                MouseButton::Right => ActivationReason::Context,
                MouseButton::Middle => ActivationReason::MiddleClick,
            },
            _ => ActivationReason::Unknown,
        }
    }

    /// Whether this is a click or double-click.
    pub fn is_click(&self) -> bool {
        matches!(
            self.kind,
            TrayEventKind::Click { .. } | TrayEventKind::DoubleClick { .. }
        )
    }
}

/// Activation of a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEvent {
    /// Identifier of the activated item.
    pub id: MenuId,
    /// New checked state, for check items whose checkmark the platform has
    /// already toggled.
    pub checked: Option<bool>,
    /// When the event was received from the platform.
    pub timestamp: Instant,
}

impl MenuEvent {
    /// Create an event stamped with the current time.
    pub fn new(id: impl Into<MenuId>, checked: Option<bool>) -> Self {
        Self {
            id: id.into(),
            checked,
            timestamp: Instant::now(),
        }
    }

    /// Identifier of the activated item.
    pub fn id(&self) -> &MenuId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tray_event(kind: TrayEventKind) -> TrayEvent {
        TrayEvent::new(TrayId::new("main"), kind, Position::default(), Rect::default())
    }

    #[test]
    fn test_activation_reason_default() {
        assert_eq!(ActivationReason::default(), ActivationReason::Unknown);
    }

    #[test]
    fn test_click_release_activates() {
        let up = tray_event(TrayEventKind::Click {
            button: MouseButton::Left,
            state: MouseButtonState::Up,
        });
        assert_eq!(up.event_type(), "click");
        assert_eq!(up.activation_reason(), ActivationReason::Click);

        let down = tray_event(TrayEventKind::Click {
            button: MouseButton::Left,
            state: MouseButtonState::Down,
        });
        assert_eq!(down.activation_reason(), ActivationReason::Unknown);
        assert!(down.is_click());
    }

    #[test]
    fn test_button_mapping() {
        let right = tray_event(TrayEventKind::Click {
            button: MouseButton::Right,
            state: MouseButtonState::Up,
        });
        assert_eq!(right.activation_reason(), ActivationReason::Context);

        let middle = tray_event(TrayEventKind::DoubleClick {
            button: MouseButton::Middle,
        });
        assert_eq!(middle.event_type(), "double-click");
        assert_eq!(middle.activation_reason(), ActivationReason::MiddleClick);

        let double = tray_event(TrayEventKind::DoubleClick {
            button: MouseButton::Left,
        });
        assert_eq!(double.activation_reason(), ActivationReason::DoubleClick);
    }

    #[test]
    fn test_hover_events() {
        for (kind, name) in [
            (TrayEventKind::Enter, "enter"),
            (TrayEventKind::Move, "move"),
            (TrayEventKind::Leave, "leave"),
        ] {
            let event = tray_event(kind);
            assert_eq!(event.event_type(), name);
            assert_eq!(event.activation_reason(), ActivationReason::Unknown);
            assert!(!event.is_click());
        }
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            position: Position::new(10.0, 10.0),
            width: 16,
            height: 16,
        };
        assert!(rect.contains(Position::new(10.0, 25.5)));
        assert!(!rect.contains(Position::new(26.0, 12.0)));
    }

    #[test]
    fn test_menu_event() {
        let event = MenuEvent::new("quit", None);
        assert_eq!(event.id(), "quit");
        assert_eq!(event.checked, None);
    }
}
