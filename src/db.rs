//! Connector and fetcher: open one Postgres connection from the discrete
//! credential settings and pull the full row set of the configured table.

use crate::config::Settings;
use crate::errors::RelayError;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::Connection;
use tracing::error;

/// Open a single connection using the host/port/dbname/user/password from
/// `settings`. No pool: the pipeline runs once and the caller closes the
/// connection at the very end of the run.
pub async fn connect(settings: &Settings) -> Result<PgConnection, RelayError> {
    let options = PgConnectOptions::new()
        .host(&settings.db_host)
        .port(settings.db_port)
        .database(&settings.db_name)
        .username(&settings.db_user)
        .password(&settings.db_password);

    Ok(PgConnection::connect_with(&options).await?)
}

/// Fetch every row of `table`.
///
/// The table name is interpolated verbatim from configuration — this is the
/// one unparameterized query in the program and the single boundary where
/// identifier allow-listing would go if it is hardened later.
pub async fn fetch_rows(
    conn: &mut PgConnection,
    table: &str,
) -> Result<Vec<PgRow>, RelayError> {
    let query = format!("SELECT * FROM {table}");
    Ok(sqlx::query(&query).fetch_all(&mut *conn).await?)
}

/// Collapse a failed fetch into an empty row set so the pipeline can
/// continue on neutral input.
pub fn rows_or_empty(fetched: Result<Vec<PgRow>, RelayError>) -> Vec<PgRow> {
    match fetched {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Error fetching data");
            Vec::new()
        }
    }
}
