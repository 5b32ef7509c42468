//! Conversions between `tray-icon` types and engine types.

use horizon_tray_core::{
    Icon, MouseButton, MouseButtonState, PlatformError, Position, Rect, Result, TrayEvent,
    TrayEventKind, TrayId,
};
use tray_icon::menu as muda;

/// Convert an engine icon into a tray image.
pub(crate) fn tray_icon(icon: &Icon) -> Result<tray_icon::Icon> {
    tray_icon::Icon::from_rgba(icon.rgba().to_vec(), icon.width(), icon.height())
        .map_err(|e| PlatformError::update_tray(format!("invalid tray icon: {e}")).into())
}

/// Convert an engine icon into a menu item image.
pub(crate) fn menu_icon(icon: &Icon) -> Result<muda::Icon> {
    muda::Icon::from_rgba(icon.rgba().to_vec(), icon.width(), icon.height())
        .map_err(|e| PlatformError::create_tray(format!("invalid menu icon: {e}")).into())
}

fn mouse_button(button: tray_icon::MouseButton) -> MouseButton {
    match button {
        tray_icon::MouseButton::Left => MouseButton::Left,
        tray_icon::MouseButton::Right => MouseButton::Right,
        tray_icon::MouseButton::Middle => MouseButton::Middle,
    }
}

fn button_state(state: tray_icon::MouseButtonState) -> MouseButtonState {
    match state {
        tray_icon::MouseButtonState::Up => MouseButtonState::Up,
        tray_icon::MouseButtonState::Down => MouseButtonState::Down,
    }
}

fn position(position: tray_icon::dpi::PhysicalPosition<f64>) -> Position {
    Position::new(position.x, position.y)
}

fn rect(rect: &tray_icon::Rect) -> Rect {
    Rect {
        position: position(rect.position),
        width: rect.size.width,
        height: rect.size.height,
    }
}

/// Convert a platform tray event. Returns `None` for event kinds the engine
/// does not model.
pub(crate) fn tray_event(event: &tray_icon::TrayIconEvent) -> Option<TrayEvent> {
    use tray_icon::TrayIconEvent as E;

    let (id, kind, pos, bounds) = match event {
        E::Click {
            id,
            position: pos,
            rect: bounds,
            button,
            button_state: state,
        } => (
            id,
            TrayEventKind::Click {
                button: mouse_button(*button),
                state: button_state(*state),
            },
            pos,
            bounds,
        ),
        E::DoubleClick {
            id,
            position: pos,
            rect: bounds,
            button,
        } => (
            id,
            TrayEventKind::DoubleClick {
                button: mouse_button(*button),
            },
            pos,
            bounds,
        ),
        E::Enter {
            id,
            position: pos,
            rect: bounds,
        } => (id, TrayEventKind::Enter, pos, bounds),
        E::Move {
            id,
            position: pos,
            rect: bounds,
        } => (id, TrayEventKind::Move, pos, bounds),
        E::Leave {
            id,
            position: pos,
            rect: bounds,
        } => (id, TrayEventKind::Leave, pos, bounds),
        _ => return None,
    };

    Some(TrayEvent::new(
        TrayId::new(id.as_ref()),
        kind,
        position(*pos),
        rect(bounds),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_tray_core::ActivationReason;
    use tray_icon::dpi::{PhysicalPosition, PhysicalSize};

    fn bounds() -> tray_icon::Rect {
        tray_icon::Rect {
            size: PhysicalSize::new(24, 24),
            position: PhysicalPosition::new(100.0, 0.0),
        }
    }

    #[test]
    fn test_click_conversion() {
        let event = tray_icon::TrayIconEvent::Click {
            id: tray_icon::TrayIconId::new("main"),
            position: PhysicalPosition::new(110.0, 12.0),
            rect: bounds(),
            button: tray_icon::MouseButton::Right,
            button_state: tray_icon::MouseButtonState::Up,
        };
        let converted = tray_event(&event).unwrap();
        assert_eq!(converted.tray_id.as_str(), "main");
        assert_eq!(converted.event_type(), "click");
        assert_eq!(converted.activation_reason(), ActivationReason::Context);
        assert_eq!(converted.position, Position::new(110.0, 12.0));
        assert_eq!(converted.icon_rect.width, 24);
        assert!(converted.icon_rect.contains(converted.position));
    }

    #[test]
    fn test_hover_conversion() {
        let event = tray_icon::TrayIconEvent::Leave {
            id: tray_icon::TrayIconId::new("main"),
            position: PhysicalPosition::new(0.0, 0.0),
            rect: bounds(),
        };
        let converted = tray_event(&event).unwrap();
        assert_eq!(converted.kind, TrayEventKind::Leave);
        assert_eq!(converted.activation_reason(), ActivationReason::Unknown);
    }

    #[test]
    fn test_icon_conversion() {
        let icon = Icon::from_rgba(vec![255; 16], 2, 2).unwrap();
        assert!(tray_icon(&icon).is_ok());
        assert!(menu_icon(&icon).is_ok());
    }
}
