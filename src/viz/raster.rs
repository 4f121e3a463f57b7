//! PNG rendering with plotters' bitmap backend.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use plotters::{
    backend::BitMapBackend,
    drawing::IntoDrawingArea,
    element::{Circle, PathElement, Text},
    style::{
        register_font,
        text_anchor::{HPos, Pos, VPos},
        Color, FontStyle, IntoFont, RGBColor,
    },
};
use tracing::debug;

use crate::{
    present::FrequencyTable,
    viz::{
        network::{self, NodeKind, StarGraph},
        wordcloud::{self, Canvas},
        Renderer,
    },
};

/// Family name the configured font is registered under.
const FONT_FAMILY: &str = "entity-lens-sans";

/// Logical canvas sizes, multiplied by the render scale.
pub const WORDCLOUD_SIZE: (u32, u32) = (1600, 800);
pub const NETWORK_SIZE: (u32, u32) = (1400, 2800);

const WHITE: RGBColor = RGBColor(255, 255, 255);
const BLACK: RGBColor = RGBColor(0, 0, 0);
const EDGE_GREY: RGBColor = RGBColor(128, 128, 128);
const LABEL_BLUE: RGBColor = RGBColor(173, 216, 230);
const ENTITY_PINK: RGBColor = RGBColor(255, 182, 193);

const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

static FONT: OnceCell<()> = OnceCell::new();

/// Draws word clouds and network panels into PNG files.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    font_path: PathBuf,
    scale: u32,
}

impl PlottersRenderer {
    pub fn new(font_path: impl Into<PathBuf>, scale: u32) -> Self {
        Self {
            font_path: font_path.into(),
            scale: scale.max(1),
        }
    }

    /// Register the font with plotters on first use. Registration is process-wide.
    fn ensure_font(&self) -> Result<()> {
        FONT.get_or_try_init(|| {
            let bytes = std::fs::read(&self.font_path)
                .with_context(|| format!("reading font {}", self.font_path.display()))?;
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            for style in [FontStyle::Normal, FontStyle::Bold] {
                register_font(FONT_FAMILY, style, bytes)
                    .map_err(|_| anyhow!("{} is not a usable font", self.font_path.display()))?;
            }
            debug!(path = %self.font_path.display(), "font registered");
            Ok::<_, anyhow::Error>(())
        })?;
        Ok(())
    }
}

impl Renderer for PlottersRenderer {
    fn prepare(&self) -> Result<()> {
        self.ensure_font()
    }

    fn render_word_cloud(&self, frequencies: &FrequencyTable, path: &Path) -> Result<()> {
        let (width, height) = (WORDCLOUD_SIZE.0 * self.scale, WORDCLOUD_SIZE.1 * self.scale);
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        if !frequencies.is_empty() {
            self.ensure_font()?;
            let words = wordcloud::layout(frequencies, Canvas { width, height }, |text, size| {
                let style = (FONT_FAMILY, f64::from(size)).into_font().color(&BLACK);
                Ok(root.estimate_text_size(text, &style)?)
            })?;
            for word in &words {
                let color = TAB10[word.color_index % TAB10.len()];
                let style = (FONT_FAMILY, f64::from(word.font_size))
                    .into_font()
                    .color(&color);
                root.draw(&Text::new(word.text.as_str(), (word.x, word.y), style))?;
            }
            debug!(placed = words.len(), total = frequencies.len(), "word cloud laid out");
        }

        root.present()?;
        Ok(())
    }

    fn render_network(&self, panels: &[StarGraph], path: &Path) -> Result<()> {
        let scale = self.scale;
        let (width, height) = (NETWORK_SIZE.0 * scale, NETWORK_SIZE.1 * scale);
        self.ensure_font()?;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let areas = root.split_evenly((panels.len().max(1), 1));

        for (area, panel) in areas.iter().zip(panels) {
            let title = (FONT_FAMILY, f64::from(32 * scale), FontStyle::Bold)
                .into_font()
                .color(&BLACK);
            let inner = area.titled(&format!("{} Network", panel.label), title)?;
            let (pw, ph) = inner.dim_in_pixel();
            let margin = 80 * scale;
            let span_x = f64::from(pw.saturating_sub(2 * margin));
            let span_y = f64::from(ph.saturating_sub(2 * margin));
            let project = |p: [f64; 2]| -> (i32, i32) {
                (
                    (f64::from(margin) + (p[0] + 1.0) / 2.0 * span_x) as i32,
                    (f64::from(margin) + (p[1] + 1.0) / 2.0 * span_y) as i32,
                )
            };

            let positions = network::spring_layout(
                &panel.graph,
                network::SPRING_K,
                network::SPRING_ITERATIONS,
                layout_seed(&panel.label),
            );

            for edge in panel.graph.edge_indices() {
                if let Some((a, b)) = panel.graph.edge_endpoints(edge) {
                    let line = vec![project(positions[a.index()]), project(positions[b.index()])];
                    inner.draw(&PathElement::new(line, EDGE_GREY.stroke_width(2 * scale)))?;
                }
            }

            for index in panel.graph.node_indices() {
                let node = &panel.graph[index];
                let (radius, fill) = match node.kind {
                    NodeKind::Label => (28 * scale, LABEL_BLUE),
                    NodeKind::Entity => (20 * scale, ENTITY_PINK),
                };
                let center = project(positions[index.index()]);
                inner.draw(&Circle::new(center, radius as i32, fill.filled()))?;
                let text = (FONT_FAMILY, f64::from(14 * scale), FontStyle::Bold)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                inner.draw(&Text::new(node.name.as_str(), center, text))?;
            }
        }

        root.present()?;
        Ok(())
    }
}

/// Stable per-label seed so a label's panel is laid out the same way each time.
fn layout_seed(label: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    label.hash(&mut hasher);
    hasher.finish()
}
