#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod run_worker;
mod views;

use app::CellrunApp;
use cr_app::AppConfig;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring config file");
            let mut config = AppConfig::default();
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 820.0])
            .with_title("cellrun"),
        ..Default::default()
    };

    eframe::run_native(
        "cellrun",
        options,
        Box::new(|cc| Ok(Box::new(CellrunApp::new(cc, config)))),
    )
}
