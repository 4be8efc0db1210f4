use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Filter comes from `RUST_LOG` (default `info`). `json` switches to
/// line-delimited JSON output. Fails if a subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    }

    Ok(())
}

/// `RUST_LOG_FORMAT=json` (any case) selects JSON output
pub fn json_requested(value: Option<&str>) -> bool {
    value.map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false)
}
