use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// sqlx logs every statement at `info`; keep that out of the default output.
const QUIET_DIRECTIVES: &str = "sqlx=warn,tower_http=info";

pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(default_level)))
        .unwrap_or_else(|_| EnvFilter::new(default_filter("info")));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn default_filter(level: &str) -> String {
    format!("{level},{QUIET_DIRECTIVES}")
}
