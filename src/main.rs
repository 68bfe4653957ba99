//! Entrypoint: set up tracing, load configuration from the environment, and
//! run the four-stage pipeline once: connect → fetch → analyze → publish.
//!
//! Every stage returns an explicit `Result`; this caller decides whether a
//! failure is terminal (no connection) or collapses to a neutral default
//! (empty row set, empty insights, null response). The process exits 0
//! regardless of which stage failed — failures are log lines, not exit
//! codes.

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use insight_relay::config::Settings;
use insight_relay::{analyzer, db, publisher};

use sqlx::Connection;

/// Application entrypoint for the insight relay.
///
/// **Workflow**:
/// 1. Initialise tracing/logging from `RUST_LOG` (or default to `info`).
/// 2. Load settings from the environment.
/// 3. Open a single Postgres connection; no connection means nothing to do.
/// 4. Fetch the full row set of the configured table (empty on failure).
/// 5. If any rows came back: analyze the configured column, log the local
///    insights, and relay them to the analysis API.
/// 6. Close the connection at the very end of the run.
#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    info!("Starting insight relay…");

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return;
        }
    };
    info!(
        host = %settings.db_host,
        database = %settings.db_name,
        table = %settings.data_table,
        sample_column = settings.sample_column,
        "Loaded configuration"
    );

    let mut conn = match db::connect(&settings).await {
        Ok(conn) => {
            info!("Database connection successful");
            conn
        }
        Err(e) => {
            // "No connection" is a checked outcome, not a crash.
            error!(error = %e, "Error connecting to database");
            return;
        }
    };

    let rows = db::rows_or_empty(db::fetch_rows(&mut conn, &settings.data_table).await);
    info!(rows = rows.len(), table = %settings.data_table, "Fetched row set");

    if !rows.is_empty() {
        let insights =
            analyzer::insights_or_empty(analyzer::analyze(&rows, settings.sample_column));
        info!(insights = %insights, "Local insights");

        let client = reqwest::Client::new();
        match publisher::send_insights(
            &client,
            publisher::ANALYZE_URL,
            &settings.gemini_api_key,
            &insights,
        )
        .await
        {
            Ok(response) => info!(response = %response, "Analysis API response"),
            Err(e) => error!(error = %e, "Error from analysis API"),
        }
    }

    if let Err(e) = conn.close().await {
        warn!(error = %e, "Error closing database connection");
    }
}
