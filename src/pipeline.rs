//! Request pipeline: extraction → presentation → images.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    error::AppError,
    nlp::{self, Entity, Ner},
    present::{highlight, table, FrequencyTable, LabelGroups, Palette},
    viz::{network, Artifact, ArtifactKind, PlottersRenderer, Renderer},
};

/// Everything the result page shows for one document.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub entities: Vec<Entity>,
    pub groups: LabelGroups,
    pub frequencies: FrequencyTable,
    pub highlighted_text: String,
    pub entity_link_table: String,
    pub wordcloud: Artifact,
    pub network: Artifact,
}

/// Shared, read-only handles used by every request.
#[derive(Clone)]
pub struct Pipeline {
    ner: Arc<dyn Ner>,
    renderer: Arc<dyn Renderer>,
    palette: Arc<Palette>,
    static_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        ner: Arc<dyn Ner>,
        renderer: Arc<dyn Renderer>,
        palette: Arc<Palette>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ner,
            renderer,
            palette,
            static_dir: static_dir.into(),
        }
    }

    /// Production wiring: on-disk model, plotters renderer, default palette.
    /// Fails if the configured font cannot be loaded.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let ner = nlp::load_model(settings).await?;
        let renderer = PlottersRenderer::new(&settings.font_path, settings.render_scale);
        renderer
            .prepare()
            .context("image renderer unavailable, set FONT_PATH to a TrueType font")?;
        Ok(Self::new(
            ner,
            Arc::new(renderer),
            Arc::new(Palette::default()),
            &settings.static_dir,
        ))
    }

    pub fn extract(&self, text: &str) -> Vec<Entity> {
        self.ner.extract(text)
    }

    /// Run the whole pipeline synchronously. The label-count check happens
    /// before any image is written, so a rejected document leaves no files.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn process(&self, text: &str) -> Result<Analysis, AppError> {
        let entities = self.ner.extract(text);
        let groups = LabelGroups::from_entities(&entities);
        let panels = network::star_graphs(&groups)?;

        let highlighted_text = highlight::render(text, &entities, &self.palette);
        let entity_link_table =
            table::render(&groups, &self.palette).map_err(|e| AppError::Internal(e.into()))?;
        let frequencies = FrequencyTable::from_entities(&entities);

        let wordcloud = Artifact::allocate(ArtifactKind::WordCloud, &self.static_dir);
        self.renderer
            .render_word_cloud(&frequencies, &wordcloud.file_path)?;
        let network = Artifact::allocate(ArtifactKind::Network, &self.static_dir);
        self.renderer.render_network(&panels, &network.file_path)?;

        info!(
            entities = entities.len(),
            labels = groups.len(),
            wordcloud = %wordcloud.file_name,
            network = %network.file_name,
            "document processed"
        );

        Ok(Analysis {
            entities,
            groups,
            frequencies,
            highlighted_text,
            entity_link_table,
            wordcloud,
            network,
        })
    }
}
