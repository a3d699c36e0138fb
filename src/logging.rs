// Tracing setup
use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
