//! Tests of the process-wide API.
//!
//! Everything that talks to a real tray host is ignored by default; run with
//! `cargo test -- --ignored` inside a desktop session.

use horizon_tray::menu::{CheckMenuItemBuilder, Menu, MenuItemBuilder};
use horizon_tray::{Error, Icon, StateError, TrayIconBuilder};

#[test]
fn test_api_before_initialize() {
    assert!(horizon_tray::try_context().is_none());
    assert_eq!(
        horizon_tray::context().unwrap_err(),
        Error::State(StateError::NotInitialized)
    );
    assert_eq!(horizon_tray::update(), 0);
    assert!(horizon_tray::poll_tray_events().is_none());
    assert!(horizon_tray::poll_menu_events().is_none());
}

#[test]
#[ignore = "requires a desktop session"]
fn test_native_tray_lifecycle() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let context = horizon_tray::initialize().unwrap();
    assert!(horizon_tray::context().is_ok());
    assert_eq!(
        horizon_tray::initialize().unwrap_err(),
        Error::State(StateError::AlreadyInitialized)
    );

    let menu = Menu::new();
    menu.append_menu_item(
        &MenuItemBuilder::new()
            .with_id("hello")
            .with_text("Hello")
            .build()
            .unwrap(),
    )
    .unwrap();
    menu.append_check_menu_item(
        &CheckMenuItemBuilder::new()
            .with_id("notif")
            .with_text("Notifications")
            .with_checked(true)
            .build()
            .unwrap(),
    )
    .unwrap();

    let tray = TrayIconBuilder::new()
        .with_icon(Icon::from_rgba(vec![255, 0, 0, 255], 1, 1).unwrap())
        .with_tooltip("Horizon Tray test")
        .with_menu(&menu)
        .build(context)
        .unwrap();
    assert!(menu.registry().has_live_peer("notif"));

    menu.set_text("hello", "Hello again").unwrap();
    menu.set_checked("notif", false).unwrap();
    assert!(!menu.is_checked("notif").unwrap());
    tray.set_tooltip(Some("updated")).unwrap();

    for _ in 0..10 {
        horizon_tray::update();
    }

    tray.destroy();
    assert!(tray.is_destroyed());
    assert!(!menu.registry().has_live_peer("notif"));
}
