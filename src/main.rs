mod app;

use portfolio_scene::catalogue::Catalogue;
use portfolio_scene::config::SceneConfig;
use portfolio_scene::render::capability::{probe_graphics, FallbackView, SceneError};

use app::PortfolioApp;

fn main() {
    env_logger::init();

    let config = SceneConfig::from_env();
    let catalogue = Catalogue::from_env().unwrap_or_else(|e| {
        log::warn!("catalogue unavailable ({}); using the embedded one", e);
        Catalogue::builtin()
    });
    log::info!(
        "portfolio: {} projects, {} certificates",
        catalogue.projects.len(),
        catalogue.certificates.len()
    );

    let capability = probe_graphics();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Portfolio",
        options,
        Box::new(move |_cc| Ok(Box::new(PortfolioApp::new(catalogue, config, capability)))),
    );

    if let Err(e) = result {
        let view = FallbackView::from_error(&SceneError::Window(e.to_string()));
        eprintln!("{}", view);
        std::process::exit(1);
    }
}
