//! End-to-end tests of the tray engine against the mock backend.

use horizon_tray_core::menu::{
    AboutMetadataBuilder, CheckMenuItemBuilder, IconMenuItemBuilder, Menu, MenuItemBuilder,
    PredefinedKind, PredefinedMenuItem, SubmenuBuilder,
};
use horizon_tray_core::{
    ActivationReason, ContextConfig, DeliveryMode, Error, Icon, MockBackend, MouseButton,
    ResolvedNode, StateError, TrayContext, TrayIconBuilder, ValidationError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn red_icon() -> Icon {
    Icon::from_rgba(vec![255, 0, 0, 255], 1, 1).unwrap()
}

fn ready(backend: &MockBackend) -> TrayContext {
    init_tracing();
    let context = TrayContext::new(backend.clone());
    context.initialize().unwrap();
    context
}

fn item(id: &str, text: &str) -> horizon_tray_core::menu::MenuItem {
    MenuItemBuilder::new()
        .with_id(id)
        .with_text(text)
        .build()
        .unwrap()
}

#[test]
fn test_quit_activation_is_delivered_once() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let menu = Menu::new();
    menu.append_menu_item(&item("hello", "Hello")).unwrap();
    menu.append_menu_item(&item("quit", "Quit")).unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    assert!(backend.simulate_menu_activation("quit"));

    let event = context.poll_menu_event().unwrap();
    assert_eq!(event.id, "quit");
    assert_eq!(event.checked, None);
    assert!(context.poll_menu_event().is_none());
}

#[test]
fn test_set_checked_on_realized_menu() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let menu = Menu::new();
    menu.append_check_menu_item(
        &CheckMenuItemBuilder::new()
            .with_id("notif")
            .with_text("Notifications")
            .with_checked(true)
            .build()
            .unwrap(),
    )
    .unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    assert_eq!(backend.peer_checked("notif"), Some(true));
    menu.set_checked("notif", false).unwrap();
    assert!(!menu.is_checked("notif").unwrap());
    assert_eq!(backend.peer_checked("notif"), Some(false));
}

#[test]
fn test_icon_buffer_validation() {
    let icon = Icon::from_rgba(vec![255, 0, 0, 255], 1, 1).unwrap();
    assert_eq!((icon.width(), icon.height()), (1, 1));

    let err = Icon::from_rgba(vec![255, 0, 0], 1, 1).unwrap_err();
    assert_eq!(
        err,
        Error::Validation(ValidationError::InvalidBufferSize {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn test_append_after_realization_fails() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let settings = SubmenuBuilder::new()
        .with_id("settings")
        .with_text("Settings")
        .build()
        .unwrap();
    settings.append_menu_item(&item("theme", "Theme")).unwrap();
    let menu = Menu::new();
    menu.append_submenu(&settings).unwrap();

    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    assert_eq!(
        settings.append_menu_item(&item("late", "Late")),
        Err(Error::State(StateError::TreeAlreadyRealized))
    );
    assert_eq!(
        menu.append_menu_item(&item("late", "Late")),
        Err(Error::State(StateError::TreeAlreadyRealized))
    );
    assert!(!menu.registry().contains("late"));
}

#[test]
fn test_menu_cannot_back_two_trays() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    let menu = Menu::with_items([item("a", "A")]).unwrap();

    let _first = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();
    let err = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap_err();
    assert_eq!(err, Error::State(StateError::TreeAlreadyRealized));
    assert_eq!(backend.live_tray_count(), 1);
}

#[test]
fn test_failed_creation_leaves_menu_editable() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    let menu = Menu::with_items([item("a", "A")]).unwrap();

    backend.fail_next_create_tray("status notifier watcher not running");
    let err = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap_err();
    assert!(err.is_platform());
    assert!(!menu.is_realized());

    menu.append_menu_item(&item("b", "B")).unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();
    assert_eq!(backend.peer_text("b").as_deref(), Some("B"));
}

#[test]
fn test_pre_realization_mutations_are_rendered() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let menu = Menu::new();
    menu.append_menu_item(&item("hello", "Hello")).unwrap();
    menu.append_predefined_menu_item(&PredefinedMenuItem::separator())
        .unwrap();
    menu.set_text("hello", "Hi there").unwrap();
    menu.set_enabled("hello", false).unwrap();

    let _tray = TrayIconBuilder::new()
        .with_id("main")
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    assert_eq!(backend.peer_text("hello").as_deref(), Some("Hi there"));
    assert_eq!(backend.peer_enabled("hello"), Some(false));

    let rendered = backend.tray("main").unwrap().menu.unwrap();
    assert_eq!(rendered.len(), 2);
    assert!(matches!(rendered[1], ResolvedNode::Predefined(_)));
}

#[test]
fn test_runtime_mutations_reach_peers() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let settings = SubmenuBuilder::new()
        .with_id("settings")
        .with_text("Settings")
        .build()
        .unwrap();
    let menu = Menu::new();
    menu.append_submenu(&settings).unwrap();
    settings
        .append_check_menu_item(
            &CheckMenuItemBuilder::new()
                .with_id("dark")
                .with_text("Dark mode")
                .build()
                .unwrap(),
        )
        .unwrap();

    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    menu.set_text("settings", "Preferences").unwrap();
    assert!(menu.toggle_check("dark").unwrap());
    menu.set_enabled("dark", false).unwrap();

    assert_eq!(backend.peer_text("settings").as_deref(), Some("Preferences"));
    assert_eq!(backend.peer_checked("dark"), Some(true));
    assert_eq!(backend.peer_enabled("dark"), Some(false));
}

fn notif_menu() -> Menu {
    let menu = Menu::new();
    menu.append_check_menu_item(
        &CheckMenuItemBuilder::new()
            .with_id("notif")
            .with_text("Notifications")
            .build()
            .unwrap(),
    )
    .unwrap();
    menu
}

#[test]
fn test_os_toggle_updates_registry_before_poll() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    let menu = notif_menu();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    backend.simulate_menu_activation("notif");
    assert!(menu.is_checked("notif").unwrap());

    let event = context.poll_menu_event().unwrap();
    assert_eq!(event.checked, Some(true));
    assert!(menu.is_checked("notif").unwrap());
}

#[test]
fn test_host_write_after_os_toggle_survives_poll() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    let menu = notif_menu();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    backend.simulate_menu_activation("notif");
    menu.set_checked("notif", false).unwrap();

    let event = context.poll_menu_event().unwrap();
    assert_eq!(event.checked, Some(true));
    assert!(!menu.is_checked("notif").unwrap());
    assert_eq!(backend.peer_checked("notif"), Some(false));
}

#[test]
fn test_pumped_toggle_is_recorded_on_dispatch() {
    let backend = MockBackend::with_mode(DeliveryMode::Pumped);
    let context = ready(&backend);
    let menu = notif_menu();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    backend.simulate_menu_activation("notif");
    menu.set_checked("notif", true).unwrap();
    // The platform toggles what it displays when it processes the click.
    context.update();

    assert_eq!(backend.peer_checked("notif"), Some(false));
    assert!(!menu.is_checked("notif").unwrap());
    assert_eq!(context.poll_menu_event().unwrap().checked, Some(false));
}

#[test]
fn test_tray_clicks_are_queued_in_order() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    let tray = TrayIconBuilder::new()
        .with_id("main")
        .with_icon(red_icon())
        .build(&context)
        .unwrap();

    backend.simulate_click("main", MouseButton::Left);
    backend.simulate_double_click("main", MouseButton::Left);
    backend.simulate_click("main", MouseButton::Right);

    let reasons: Vec<_> = context
        .drain_tray_events()
        .iter()
        .map(|event| {
            assert_eq!(event.tray_id, *tray.id());
            event.activation_reason()
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            ActivationReason::Click,
            ActivationReason::DoubleClick,
            ActivationReason::Context
        ]
    );
}

#[test]
fn test_overflow_drops_oldest_menu_events() {
    let backend = MockBackend::new();
    init_tracing();
    let context = TrayContext::with_config(
        backend.clone(),
        ContextConfig::default().menu_queue_capacity(2),
    );
    context.initialize().unwrap();

    let menu = Menu::with_items([item("a", "A"), item("b", "B"), item("c", "C")]).unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    for id in ["a", "b", "c"] {
        backend.simulate_menu_activation(id);
    }
    assert_eq!(context.bridge().dropped_menu(), 1);
    let ids: Vec<_> = context
        .drain_menu_events()
        .into_iter()
        .map(|e| e.id.into_string())
        .collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[test]
fn test_pumped_delivery_needs_update() {
    let backend = MockBackend::with_mode(DeliveryMode::Pumped);
    init_tracing();
    let context = TrayContext::with_config(backend.clone(), ContextConfig::default().pump_budget(1));
    assert_eq!(context.update(), 0);
    context.initialize().unwrap();

    let menu = Menu::with_items([item("a", "A"), item("b", "B")]).unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    backend.simulate_menu_activation("a");
    backend.simulate_menu_activation("b");
    assert!(context.poll_menu_event().is_none());

    assert_eq!(context.update(), 1);
    assert_eq!(context.poll_menu_event().unwrap().id, "a");
    assert!(context.poll_menu_event().is_none());
    assert_eq!(context.update(), 1);
    assert_eq!(context.poll_menu_event().unwrap().id, "b");
    assert_eq!(context.update(), 0);
    assert_eq!(context.pump().ticks(), 3);
}

#[test]
fn test_second_initialize_fails() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    assert_eq!(
        context.initialize(),
        Err(Error::State(StateError::AlreadyInitialized))
    );
}

#[test]
fn test_destroy_detaches_peers() {
    let backend = MockBackend::new();
    let context = ready(&backend);
    let menu = Menu::with_items([item("hello", "Hello")]).unwrap();
    let tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();
    assert!(menu.registry().has_live_peer("hello"));

    tray.destroy();
    tray.destroy();
    assert!(tray.is_destroyed());
    assert!(!menu.registry().has_live_peer("hello"));
    assert!(!backend.simulate_menu_activation("hello"));

    // State stays readable and writable; the shape stays frozen.
    menu.set_text("hello", "Bye").unwrap();
    assert_eq!(menu.text("hello").unwrap(), "Bye");
    assert!(menu.append_menu_item(&item("x", "X")).is_err());
}

#[test]
fn test_polling_from_another_thread() {
    let backend = MockBackend::new();
    let context = std::sync::Arc::new(ready(&backend));
    let menu = Menu::with_items([item("hello", "Hello")]).unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    backend.simulate_menu_activation("hello");
    let poller = std::sync::Arc::clone(&context);
    let id = std::thread::spawn(move || poller.poll_menu_event().map(|e| e.id))
        .join()
        .unwrap();
    assert_eq!(id.unwrap(), "hello");
}

#[test]
fn test_realized_submenu_cannot_join_another_menu() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let shared = SubmenuBuilder::new()
        .with_id("shared")
        .with_text("Shared")
        .build()
        .unwrap();
    let first = Menu::new();
    first.append_submenu(&shared).unwrap();
    let _tray = TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&first)
        .build(&context)
        .unwrap();

    let second = Menu::new();
    assert_eq!(
        second.append_submenu(&shared),
        Err(Error::State(StateError::TreeAlreadyRealized))
    );

    // A failed tray on the second menu must not thaw the first tray's tree.
    second.append_menu_item(&item("other", "Other")).unwrap();
    backend.fail_next_create_tray("no tray host");
    assert!(TrayIconBuilder::new()
        .with_icon(red_icon())
        .with_menu(&second)
        .build(&context)
        .is_err());

    assert!(first.is_realized());
    assert!(shared.is_realized());
    assert_eq!(
        shared.append_menu_item(&item("late", "Late")),
        Err(Error::State(StateError::TreeAlreadyRealized))
    );
}

#[test]
fn test_icon_and_about_items_are_rendered() {
    let backend = MockBackend::new();
    let context = ready(&backend);

    let green = Icon::from_rgba(vec![0, 255, 0, 255, 0, 255, 0, 255], 2, 1).unwrap();
    let menu = Menu::new();
    menu.append_icon_menu_item(
        &IconMenuItemBuilder::new()
            .with_id("status")
            .with_text("Online")
            .with_icon(green)
            .build()
            .unwrap(),
    )
    .unwrap();
    let metadata = AboutMetadataBuilder::new()
        .with_name("Horizon")
        .with_version("1.0.0")
        .build();
    menu.append_predefined_menu_item(&PredefinedMenuItem::about(
        Some("About Horizon"),
        Some(metadata.clone()),
    ))
    .unwrap();
    menu.set_text("status", "Away").unwrap();

    let _tray = TrayIconBuilder::new()
        .with_id("main")
        .with_icon(red_icon())
        .with_menu(&menu)
        .build(&context)
        .unwrap();

    let rendered = backend.tray("main").unwrap().menu.unwrap();
    assert_eq!(rendered.len(), 2);
    match &rendered[0] {
        ResolvedNode::Icon {
            id,
            text,
            enabled,
            icon,
        } => {
            assert_eq!(id, "status");
            assert_eq!(text, "Away");
            assert!(*enabled);
            assert_eq!((icon.width(), icon.height()), (2, 1));
        }
        other => panic!("expected an icon item, got {other:?}"),
    }
    match &rendered[1] {
        ResolvedNode::Predefined(about) => {
            assert_eq!(about.text(), Some("About Horizon"));
            assert_eq!(about.kind(), &PredefinedKind::About(Some(metadata)));
        }
        other => panic!("expected an about item, got {other:?}"),
    }

    // Icon items get a peer; predefined items have none.
    assert_eq!(backend.peer_text("status").as_deref(), Some("Away"));
    assert_eq!(backend.peer_checked("status"), None);
    menu.set_enabled("status", false).unwrap();
    assert_eq!(backend.peer_enabled("status"), Some(false));
    assert!(!backend.simulate_menu_activation("status"));
}
