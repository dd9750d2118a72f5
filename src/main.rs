pub mod config;
pub mod controller;
pub mod mapping;
pub mod persistence;
pub mod ui;

use crate::config::{SettingsOrigin, ShellSettings};
use crate::controller::event_collector::{CollectorSettings, EventCollector};
use crate::ui::StarpadUI;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // The verbose flag decides the log level, so settings load before logging is up
    let loaded = ShellSettings::load();
    let verbose = loaded.as_ref().map(|(s, _)| s.verbose).unwrap_or(false);
    setup(verbose)?;

    let settings = match loaded {
        Ok((settings, origin @ SettingsOrigin::File(_))) => {
            info!("{}", origin);
            settings
        }
        Ok((settings, origin @ SettingsOrigin::Defaults(_))) => {
            warn!("{}", origin);
            settings
        }
        Err(e) => {
            warn!("Falling back to default settings: {}", e);
            ShellSettings::default()
        }
    };
    debug!("{:?}", settings);

    info!("Initializing controller input");
    let collector_settings = CollectorSettings {
        joystick_deadzone: settings.joystick_deadzone,
    };
    let collector = EventCollector::create(Some(collector_settings))
        .map_err(|e| eyre!("Failed to create event collector: {}", e))?
        .initialize();

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport =
        egui::ViewportBuilder::default().with_fullscreen(settings.fullscreen);

    eframe::run_native(
        "Starpad",
        native_options,
        Box::new(|cc| Ok(Box::new(StarpadUI::new(cc, settings, collector)))),
    )
    .map_err(|e| eyre!("UI terminated with error: {}", e))?;

    info!("UI closed, shutting down");
    Ok(())
}

fn setup(verbose: bool) -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env(verbose);
    Ok(())
}

fn setup_logging_env(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
