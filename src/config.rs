//! Runtime configuration utilities for entity-lens.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Folder receiving uploaded text files.
    pub upload_dir: PathBuf,
    /// Folder receiving generated images, served under `/static`.
    pub static_dir: PathBuf,
    /// Optional model folder holding `gazetteer.json`.
    pub model_dir: Option<PathBuf>,
    /// TrueType font used when rasterising labels.
    pub font_path: PathBuf,
    /// Pixel multiplier applied to the logical canvas sizes.
    pub render_scale: u32,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));
        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./static"));
        let model_dir = env::var("MODEL_DIR").ok().map(PathBuf::from);
        let font_path = env::var("FONT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FONT));
        let render_scale = env::var("RENDER_SCALE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|scale| *scale > 0)
            .unwrap_or(2);

        let settings = Self {
            upload_dir,
            static_dir,
            model_dir,
            font_path,
            render_scale,
        };
        settings.ensure_dirs()?;
        Ok(settings)
    }

    /// Create the upload and static folders if they are absent.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.upload_dir).context("creating upload dir")?;
        std::fs::create_dir_all(&self.static_dir).context("creating static dir")?;
        Ok(())
    }

    /// Path of a file inside the static folder.
    pub fn join_static<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.static_dir.join(path)
    }
}
