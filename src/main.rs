use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;

use hr_dashboard::app::HrDashboardApp;
use hr_dashboard::config::Config;
use hr_dashboard::state::AppState;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.init_logging();

    // Load errors abort startup: the window never opens without a table.
    let mut state = AppState::new(config.data.clone(), config.date_policy);
    state
        .load()
        .with_context(|| format!("loading {}", config.data.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(HrDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
