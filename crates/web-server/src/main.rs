// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings, installs tracing and hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_settings()?;
    let _guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(&settings).await
}
