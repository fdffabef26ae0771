//! Legacy Flow - Entry Point
//!
//! Släktträd, andlig silsila och böneguide med uppläsning.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(dead_code)]

mod app;
mod models;
mod services;
mod ui;
mod utils;

use app::LegacyFlowApp;
use eframe::egui;
use models::AppSettings;

fn main() -> eframe::Result<()> {
    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Startar Legacy Flow v{}", env!("CARGO_PKG_VERSION"));

    // Bakgrundsarbete (nätverk och ljud) körs på en egen runtime
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Kunde inte starta runtime: {}", e);
            return Err(eframe::Error::AppCreation(Box::new(e)));
        }
    };

    let app_settings = AppSettings::load();

    // Fönsterinställningar
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Legacy Flow v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([app_settings.window_width, app_settings.window_height])
            .with_min_inner_size([400.0, 500.0])
            .with_app_id("legacy-flow"),
        ..Default::default()
    };

    // Starta applikationen
    let handle = runtime.handle().clone();
    eframe::run_native(
        "Legacy Flow",
        options,
        Box::new(move |cc| Ok(Box::new(LegacyFlowApp::new(cc, app_settings, handle)?))),
    )
}
