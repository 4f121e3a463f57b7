//! CLI entry-point for analysing a single file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use crate::{
    config::Settings,
    error::AppError,
    input,
    nlp::{self, Entity, Ner},
    pipeline::Pipeline,
    present::{FrequencyTable, LabelGroups},
};

/// Args for the `extract` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// UTF-8 text file to analyse.
    #[arg(long)]
    pub input: PathBuf,
    /// Only report entities; skip the word cloud and network images.
    #[arg(long)]
    pub no_images: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    entities: &'a [Entity],
    labels: &'a LabelGroups,
    frequencies: &'a FrequencyTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    wordcloud: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'a Path>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let raw = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("reading {}", args.input.display()))?;
    let raw = String::from_utf8(raw).map_err(|_| AppError::InvalidEncoding)?;
    let text = input::text_from_form(&raw)?;

    let json = if args.no_images {
        let entities = nlp::load_model(&settings).await?.extract(&text);
        let labels = LabelGroups::from_entities(&entities);
        let frequencies = FrequencyTable::from_entities(&entities);
        serde_json::to_string_pretty(&Report {
            entities: &entities,
            labels: &labels,
            frequencies: &frequencies,
            wordcloud: None,
            network: None,
        })?
    } else {
        let pipeline = Pipeline::from_settings(&settings).await?;
        let analysis = pipeline.process(&text)?;
        serde_json::to_string_pretty(&Report {
            entities: &analysis.entities,
            labels: &analysis.groups,
            frequencies: &analysis.frequencies,
            wordcloud: Some(&analysis.wordcloud.file_path),
            network: Some(&analysis.network.file_path),
        })?
    };
    println!("{json}");
    Ok(())
}
