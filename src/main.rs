mod engine;
mod model;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use eframe::egui;
use log::info;

use crate::engine::api_client::{GameBackend, HttpGateway};
use crate::engine::engine::Engine;
use crate::ui::app::RpgApp;
use crate::ui::route::Route;

/// Opens the client on a specific route, e.g. `/game/abc123`.
const START_ROUTE_ENV: &str = "RPG_START_ROUTE";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = ui::settings_io::load_settings().with_env_overrides();
    let start = std::env::var(START_ROUTE_ENV)
        .ok()
        .and_then(|path| Route::parse(&path))
        .unwrap_or(Route::Title);

    let gateway = HttpGateway::new(&settings.api_base_url, settings.request_timeout())
        .context("configuring the game service client")?;
    info!("game service: {}", gateway.base_url());
    let backend: Arc<dyn GameBackend> = Arc::new(gateway);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Text RPG Adventure",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let link = Engine::spawn(backend, Box::new(move || ctx.request_repaint()))?;
            Ok(Box::new(RpgApp::new(settings, link, start)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("ui exited with an error: {e}"))
}
