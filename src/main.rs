#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// src/main.rs
// Entry point for ModelDeck: sets up the logger, the UI update channel, and
// launches the eframe application.

mod app;

use app::{
    config::{AppSettings, APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL},
    state::UpdateMessage,
    ModelDeckApp,
};
use chrono::Local;
use chrono_tz::Tz;
use eframe::egui;
use log::{info, LevelFilter};
use std::{str::FromStr, sync::mpsc::channel};

/// The log level the persisted settings ask for, falling back to the default
/// when the stored string is invalid.
fn logger_filter_from(settings: &AppSettings) -> LevelFilter {
    LevelFilter::from_str(&settings.log_level).unwrap_or_else(|_| {
        LevelFilter::from_str(DEFAULT_LOG_LEVEL).expect("Default log level is invalid")
    })
}

fn main() -> Result<(), eframe::Error> {
    // The persisted settings are needed before the app exists so that the
    // logger honours the saved log level and timezone; they are then handed
    // to the app rather than loaded a second time. eprintln is used for
    // problems here because the logger is not up yet.
    let settings: AppSettings = match confy::load(APP_NAME, None) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!(
                "WARN: Failed to load config file ('{}'), using defaults: {}",
                APP_NAME, e
            );
            let default_settings = AppSettings::default();
            if let Err(store_err) = confy::store(APP_NAME, None, &default_settings) {
                eprintln!("WARN: Failed to store default settings: {}", store_err);
            }
            default_settings
        }
    };

    let (update_sender, update_receiver) = channel();
    let logger_sender = update_sender.clone();

    let app_log_level = logger_filter_from(&settings);
    let logger_tz = Tz::from_str(&settings.tz).unwrap_or_else(|_| {
        eprintln!(
            "WARN: Invalid TZ '{}' in settings, logger falling back to UTC.",
            settings.tz
        );
        Tz::UTC
    });

    // Initialize Logger
    let log_level_to_init = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        app_log_level
    };
    env_logger::Builder::new()
        .filter_level(log_level_to_init)
        .format(move |buf, record| {
            use std::io::Write;
            let now = Local::now().with_timezone(&logger_tz);
            let log_msg = format!(
                "[{}] [{}] {}",
                now.format("%Y-%m-%d %H:%M:%S %Z"),
                record.level(),
                record.args()
            );
            // Mirror INFO and lower logs to the GUI log panel
            if record.level() <= LevelFilter::Info {
                let _ = logger_sender.send(UpdateMessage::Log(log_msg.clone()));
            }
            writeln!(buf, "{}", log_msg)
        })
        .init();

    info!("--- {} v{} Starting ---", APP_NAME, APP_VERSION);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(ModelDeckApp::new(
                cc,
                settings,
                update_sender,
                update_receiver,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_filter_follows_persisted_log_level() {
        // The stored setting, not the environment, decides the filter.
        let mut settings = AppSettings::default();
        settings.log_level = "DEBUG".to_string();
        assert_eq!(logger_filter_from(&settings), LevelFilter::Debug);
        settings.log_level = "ERROR".to_string();
        assert_eq!(logger_filter_from(&settings), LevelFilter::Error);
    }

    #[test]
    fn logger_filter_falls_back_on_invalid_level() {
        let mut settings = AppSettings::default();
        settings.log_level = "CHATTY".to_string();
        assert_eq!(
            logger_filter_from(&settings),
            LevelFilter::from_str(DEFAULT_LOG_LEVEL).unwrap()
        );
    }
}
