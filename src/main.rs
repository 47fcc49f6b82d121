// Entrypoint for the StoryLens CLI.
// - Sets up logging on stderr so it stays out of the menu.
// - Builds the API client from the environment and hands it to the UI loop.

use storylens_cli::{ui::main_menu, ApiClient, Settings, UploadClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("storylens_cli=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Service origin comes from `STORYLENS_SERVICE_URL`, default
    // http://localhost:8000. See `config::Settings::from_env`.
    let settings = Settings::from_env();
    info!(service_url = %settings.service_url, "Starting StoryLens");
    let api = ApiClient::from_settings(&settings)?;

    // Blocks until the user exits.
    main_menu(UploadClient::new(api), &settings)?;
    Ok(())
}
