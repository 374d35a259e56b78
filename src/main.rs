use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use crate::api::charts::{self, CORE_CHART_PACKAGE};
use crate::config::AppConfig;
use crate::services::chart_service::{self, RenderOutcome};
use crate::services::series_service::{self, GeneratorConfig, SeriesGenerator, ThreadRandom};
use crate::utils::page::Document;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("goods_chart=debug".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting goods pricing chart...");

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut document = Document::demo();

    // Drawing must wait until the chart library reports ready
    info!("Loading chart packages...");
    let charts = match charts::load(&[CORE_CHART_PACKAGE]).await {
        Ok(c) => {
            info!("Chart library ready: {}", c.packages().join(", "));
            c
        }
        Err(e) => {
            error!("Failed to load chart library: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut generator = SeriesGenerator::new(GeneratorConfig::default(), ThreadRandom::default());
    let series = generator.generate();
    info!(
        "Generated {} points for {} goods",
        series.len(),
        generator.config().goods.len()
    );
    debug!("\n{}", series_service::format_series_table(&series));

    match chart_service::draw_chart(&series, &mut document, &charts) {
        Ok(RenderOutcome::Rendered) => {}
        Ok(RenderOutcome::RegionMissing) => {
            info!("Page has no chart region; writing it without a chart");
        }
        Err(e) => {
            error!("Chart rendering failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = tokio::fs::write(&config.output_path, document.to_html()).await {
        error!("Failed to write {}: {}", config.output_path.display(), e);
        return ExitCode::FAILURE;
    }
    info!("✓ Page written to {}", config.output_path.display());

    ExitCode::SUCCESS
}
