//! Input acquisition: form text and uploaded files.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, InputSource};

/// A file part pulled out of a multipart body.
#[derive(Debug, Clone, Default)]
pub struct FileUpload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Validate text typed into the form.
pub fn text_from_form(raw: &str) -> Result<String, AppError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AppError::EmptyInput(InputSource::Text));
    }
    Ok(text.to_string())
}

/// Persist an upload into `upload_dir`, read it back and decode it as UTF-8.
///
/// The saved copy is what gets decoded, so the file on disk always matches what
/// was analysed. Same-named uploads overwrite each other.
pub fn save_and_read(upload: Option<FileUpload>, upload_dir: &Path) -> Result<String, AppError> {
    let upload = upload.ok_or(AppError::MissingFile)?;
    let original = match upload.filename.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AppError::MissingFile),
    };

    std::fs::create_dir_all(upload_dir)?;
    let path = upload_path(upload_dir, original);
    std::fs::write(&path, &upload.bytes)?;
    info!(path = %path.display(), bytes = upload.bytes.len(), "file saved");

    let raw = std::fs::read(&path)?;
    let decoded = String::from_utf8(raw).map_err(|_| AppError::InvalidEncoding)?;
    let text = decoded.trim();
    if text.is_empty() {
        return Err(AppError::EmptyInput(InputSource::File));
    }
    Ok(text.to_string())
}

fn upload_path(upload_dir: &Path, original: &str) -> PathBuf {
    let name = sanitize_filename(original)
        .unwrap_or_else(|| format!("upload_{}.txt", Uuid::new_v4()));
    upload_dir.join(name)
}

/// Reduce a client supplied filename to a safe single path component.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    static UNSAFE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));

    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
