use clap::{Parser, Subcommand};
use configuration::load_settings;
use database::{connect, run_migrations, seed_counties};

/// The main entry point for the KNBS open data service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = load_settings()?;
    let _guard = configuration::init_tracing(&settings.logging)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => web_server::run_server(&settings).await,
        Commands::Seed => {
            let pool = connect(&settings.database).await?;
            run_migrations(&pool).await?;
            let summary = seed_counties(&pool).await?;
            tracing::info!(
                created = summary.created,
                skipped = summary.skipped,
                "Seeding complete."
            );
            pool.close().await;
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Read-only HTTP API over KNBS county statistics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (the default when no command is given).
    Serve,
    /// Load the canonical list of 47 counties. Existing rows are left alone.
    Seed,
}
