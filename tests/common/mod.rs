#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use entity_lens::{
    api::{self, AppState},
    config::Settings,
    nlp::GazetteerNer,
    pipeline::Pipeline,
    present::{FrequencyTable, Palette},
    viz::{Renderer, StarGraph},
};
use indexmap::IndexMap;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "entity-lens-test-boundary";

/// Writes a short text description instead of a PNG so tests need no fonts.
pub struct RecordingRenderer;

impl Renderer for RecordingRenderer {
    fn render_word_cloud(&self, frequencies: &FrequencyTable, path: &Path) -> anyhow::Result<()> {
        let words: Vec<String> = frequencies
            .ranked()
            .into_iter()
            .map(|(text, count)| format!("{text}={count}"))
            .collect();
        std::fs::write(path, words.join("\n"))?;
        Ok(())
    }

    fn render_network(&self, panels: &[StarGraph], path: &Path) -> anyhow::Result<()> {
        let labels: Vec<String> = panels
            .iter()
            .map(|p| format!("{}:{}", p.label, p.graph.edge_count()))
            .collect();
        std::fs::write(path, labels.join("\n"))?;
        Ok(())
    }
}

pub fn lexicon() -> IndexMap<String, Vec<String>> {
    let mut lexicon = IndexMap::new();
    lexicon.insert(
        "DISEASE".to_string(),
        vec!["rice blast".into(), "late blight".into(), "foo bar".into()],
    );
    lexicon.insert(
        "NON-CODING_RNA".to_string(),
        vec!["miR-156".into(), "miR-172".into()],
    );
    lexicon.insert("GENE".to_string(), vec!["OsWRKY45".into()]);
    lexicon
}

pub struct Harness {
    pub dir: TempDir,
    pub settings: Settings,
    pub pipeline: Arc<Pipeline>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = Settings {
            upload_dir: dir.path().join("uploads"),
            static_dir: dir.path().join("static"),
            model_dir: None,
            font_path: dir.path().join("no-font.ttf"),
            render_scale: 1,
        };
        settings.ensure_dirs().expect("dirs");
        let ner = GazetteerNer::new(&lexicon()).expect("gazetteer");
        let pipeline = Pipeline::new(
            Arc::new(ner),
            Arc::new(RecordingRenderer),
            Arc::new(Palette::default()),
            &settings.static_dir,
        );
        Self {
            dir,
            settings,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn router(&self) -> Router {
        api::router(AppState {
            settings: self.settings.clone(),
            pipeline: self.pipeline.clone(),
        })
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = self.router().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, headers, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn static_files(&self) -> Vec<String> {
        list(&self.settings.static_dir)
    }

    pub fn upload_files(&self) -> Vec<String> {
        list(&self.settings.upload_dir)
    }
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn form_request(text: &str) -> Request<Body> {
    Request::post("/extract_entities")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("text={}", form_encode(text))))
        .expect("request")
}

pub fn file_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Request::post("/predict_file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

fn form_encode(text: &str) -> String {
    text.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect()
}
