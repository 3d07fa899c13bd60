use crate::error::ConfigError;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, ServerSettings, Settings};

/// Loads the application settings.
///
/// Sources are layered lowest to highest priority: built-in defaults, an
/// optional `config.toml` in the working directory, `APP__SECTION__KEY`
/// environment variables, and finally the plain `DATABASE_URL` and `PORT`
/// variables. Callers are expected to have loaded any `.env` file already.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(
        Path::new("config.toml"),
        env::var("DATABASE_URL").ok(),
        env::var("PORT").ok(),
    )
}

/// Same as [`load_settings`] with the file path and the two well-known
/// variables supplied by the caller.
pub fn load_settings_from(
    path: &Path,
    database_url: Option<String>,
    port: Option<String>,
) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("database.max_lifetime_secs", 60 * 60)?
        .set_default("database.idle_timeout_secs", 30 * 60)?
        .set_default("database.statement_timeout_secs", 30)?
        .set_default("logging.level", "info")?
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .set_override_option("database.url", database_url)?
        .set_override_option("server.port", port)?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
