use anyhow::anyhow;
use eframe::egui;
use sketch_solver::gui::SketchApp;
use sketch_solver::settings::{resolve_settings_path, SolverSettings};
use sketch_solver::sketch::{HttpRecognitionService, SessionConfig, SketchSession};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings_path = resolve_settings_path()?;
    let settings = SolverSettings::load(&settings_path)?.apply_env();
    sketch_solver::logging::init(settings.debug_logging, settings.log_file.as_deref());
    tracing::info!(
        path = %settings_path.display(),
        api_url = %settings.api_url,
        "settings loaded"
    );

    let service = HttpRecognitionService::from_settings(&settings)?;
    let session = SketchSession::new(SessionConfig::from_settings(&settings), Arc::new(service));
    let app = SketchApp::new(session, &settings);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sketch Solver",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|err| anyhow!("sketch window failed: {err}"))
}
