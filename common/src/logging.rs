use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::{EnvFilter, Registry};

static RELOAD_HANDLE: OnceCell<Handle<EnvFilter, Registry>> = OnceCell::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Json,
}

/// Initialize the global subscriber. Safe to call more than once, later
/// calls only reload the filter.
pub fn init(level: &str, mode: Mode) -> Result<()> {
    let reload = RELOAD_HANDLE.get_or_try_init(|| {
        let env_filter = EnvFilter::from_str(level)?;

        let (filter, handle) = tracing_subscriber::reload::Layer::new(env_filter);

        let fmt = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_file(true);

        let registry = tracing_subscriber::registry().with(filter);

        match mode {
            Mode::Json => registry.with(fmt.json()).try_init(),
            Mode::Default => registry.with(fmt.pretty()).try_init(),
        }
        .map(|_| handle)
        .map_err(anyhow::Error::from)
    })?;

    reload.reload(level)?;

    Ok(())
}
