//! Tray demo.
//!
//! Shows a tray icon with a small menu and prints every event until "Quit"
//! is chosen.
//!
//! Run with: cargo run -p horizon-tray --example tray_demo

use std::time::Duration;

use horizon_tray::menu::{
    AboutMetadataBuilder, CheckMenuItemBuilder, Menu, MenuItemBuilder, PredefinedMenuItem,
    SubmenuBuilder,
};
use horizon_tray::{ActivationReason, Icon, TrayIconBuilder};

/// A 16x16 icon: a filled circle.
fn circle_icon(rgb: [u8; 3]) -> Result<Icon, horizon_tray::Error> {
    const SIZE: u32 = 16;
    let center = (SIZE as f32 - 1.0) / 2.0;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let alpha = if dx * dx + dy * dy <= center * center { 255 } else { 0 };
            rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], alpha]);
        }
    }
    Icon::from_rgba(rgba, SIZE, SIZE)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horizon_tray=info,horizon_tray_core=info".into()),
        )
        .init();

    let context = horizon_tray::initialize()?;

    let settings = SubmenuBuilder::new()
        .with_id("settings")
        .with_text("Settings")
        .build()?;
    settings.append_check_menu_item(
        &CheckMenuItemBuilder::new()
            .with_id("notif")
            .with_text("Notifications")
            .with_checked(true)
            .build()?,
    )?;
    settings.append_check_menu_item(
        &CheckMenuItemBuilder::new()
            .with_id("busy")
            .with_text("Busy")
            .build()?,
    )?;

    let menu = Menu::new();
    menu.append_menu_item(
        &MenuItemBuilder::new()
            .with_id("hello")
            .with_text("Hello")
            .build()?,
    )?;
    menu.append_submenu(&settings)?;
    menu.append_predefined_menu_item(&PredefinedMenuItem::separator())?;
    menu.append_predefined_menu_item(&PredefinedMenuItem::about(
        None,
        Some(
            AboutMetadataBuilder::new()
                .with_name("Tray Demo")
                .with_version(env!("CARGO_PKG_VERSION"))
                .build(),
        ),
    ))?;
    menu.append_menu_item(
        &MenuItemBuilder::new()
            .with_id("quit")
            .with_text("Quit")
            .build()?,
    )?;

    let idle = circle_icon([40, 160, 40])?;
    let busy = circle_icon([200, 60, 40])?;
    let tray = TrayIconBuilder::new()
        .with_id("demo")
        .with_icon(idle.clone())
        .with_tooltip("Horizon Tray demo")
        .with_menu(&menu)
        .build(context)?;

    let mut greetings = 0;
    loop {
        horizon_tray::update();

        while let Some(event) = horizon_tray::poll_tray_events() {
            if event.activation_reason() != ActivationReason::Unknown {
                println!("tray {}: {:?}", event.event_type(), event.activation_reason());
            }
        }

        while let Some(event) = horizon_tray::poll_menu_events() {
            match event.id.as_str() {
                "quit" => {
                    tray.destroy();
                    return Ok(());
                }
                "hello" => {
                    greetings += 1;
                    menu.set_text("hello", format!("Hello ({greetings})"))?;
                }
                "busy" => {
                    let busy_now = menu.is_checked("busy")?;
                    tray.set_icon(Some(if busy_now { busy.clone() } else { idle.clone() }))?;
                    menu.set_enabled("notif", !busy_now)?;
                }
                other => println!("menu {other} (checked: {:?})", event.checked),
            }
        }

        std::thread::sleep(Duration::from_millis(16));
    }
}
