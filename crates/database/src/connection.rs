use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

/// Pool options derived from the settings, without connecting.
pub fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .max_lifetime(settings.max_lifetime())
        .idle_timeout(settings.idle_timeout())
}

/// Parses the connection string and sets `statement_timeout` on every
/// session, so PostgreSQL cancels a query that runs past the limit.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    let options = settings
        .url
        .parse::<PgConnectOptions>()?
        .options([("statement_timeout", settings.statement_timeout().as_millis())]);
    Ok(options)
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is the only shared resource in the server. Each query checks a
/// connection out for its own duration, so `max_connections` bounds the
/// number of in-flight queries. Connecting eagerly opens one connection,
/// which doubles as the startup liveness check.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "DATABASE_URL must be set.".to_string(),
        ));
    }

    let pool = pool_options(settings)
        .connect_with(connect_options(settings)?)
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        "Connected to PostgreSQL."
    );
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
