//! Image generation: word clouds and label/entity network diagrams.

pub mod network;
pub mod raster;
pub mod wordcloud;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::present::FrequencyTable;

pub use network::StarGraph;
pub use raster::PlottersRenderer;

/// URL prefix under which the static folder is served.
pub const STATIC_ROUTE: &str = "/static";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    WordCloud,
    Network,
}

impl ArtifactKind {
    fn prefix(self) -> &'static str {
        match self {
            ArtifactKind::WordCloud => "wordcloud",
            ArtifactKind::Network => "network",
        }
    }
}

/// A generated image. Every allocation gets a fresh random name; files are never reused or removed.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub file_path: PathBuf,
    pub public_url: String,
}

impl Artifact {
    pub fn allocate(kind: ArtifactKind, static_dir: &Path) -> Self {
        let file_name = format!("{}_{}.png", kind.prefix(), Uuid::new_v4());
        Self {
            kind,
            file_path: static_dir.join(&file_name),
            public_url: format!("{STATIC_ROUTE}/{file_name}"),
            file_name,
        }
    }
}

/// Rasterises the two diagrams to disk.
pub trait Renderer: Send + Sync {
    /// Load whatever drawing needs up front, so a missing resource is
    /// reported at startup rather than on the first request.
    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Draw a word cloud; an empty table must still produce an image.
    fn render_word_cloud(&self, frequencies: &FrequencyTable, path: &Path) -> Result<()>;

    /// Draw one stacked panel per star graph, in the given order.
    fn render_network(&self, panels: &[StarGraph], path: &Path) -> Result<()>;
}
