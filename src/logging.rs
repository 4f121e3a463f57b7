//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directive when `RUST_LOG` is unset: our crate at debug, HTTP spans at info.
const DEFAULT_DIRECTIVES: &str = "info,entity_lens=debug,tower_http=info";

/// Install a global tracing subscriber writing to stderr, leaving stdout to
/// command output. Calling it twice is a no-op.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    tracing::debug!(directives = DEFAULT_DIRECTIVES, "tracing initialised");
    Ok(())
}
