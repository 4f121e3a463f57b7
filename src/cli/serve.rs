//! CLI entry-point for serving the web interface.

use std::sync::Arc;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::{self, AppState},
    config::Settings,
    pipeline::Pipeline,
};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 5000).
    #[arg(long, default_value_t = 5000)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings).await?;
    let state = AppState {
        settings,
        pipeline: Arc::new(pipeline),
    };
    api::serve(state, args.host, args.port).await
}
