use anyhow::{Context, Result};
use tracing::{info, warn};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use infrastructure::database::{create_pool, reset_store_file, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    if settings.reset_database_on_start {
        warn!("RESET_DATABASE_ON_START is set, dropping existing data");
        reset_store_file(&settings.database_url).await?;
    }

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    tokio::fs::create_dir_all(&settings.upload_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                settings.upload_dir.display()
            )
        })?;
    info!(upload_dir = %settings.upload_dir.display(), "serving uploads");

    let state = AppState::build(pool, &settings.upload_dir, settings.session_ttl_seconds);
    server::run_http(&settings, state).await
}
