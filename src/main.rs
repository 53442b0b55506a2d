mod app;
use vocab_app::*;

use app::VocabApp;
use database::db::init_database;
use dictionary::{DictionaryClient, LookupWorker};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vocab=info,vocab_app=info")),
        )
        .with_target(false)
        .init();
}

/// Everything the window needs before it opens.
fn prepare() -> AppResult<VocabApp> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        db = %config.db_path.display(),
        intervals = %config.intervals,
        "starting"
    );

    let conn = init_database(&config.db_path)?;
    let client = DictionaryClient::new(config.dictionary_url, config.http_timeout)?;
    let lookups = LookupWorker::spawn(client);
    let scheduler = ReviewScheduler::new(config.intervals);

    Ok(VocabApp::new(conn, scheduler, lookups)?)
}

fn main() -> eframe::Result<()> {
    init_logging();

    let app = match prepare() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("failed to start: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Vocabulary",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
