//! HTTP route handlers for Axum.

use askama::Template;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use tracing::warn;

use crate::{
    api::types::{EntitiesResponse, IndexPage, ResultPage, TextForm},
    error::AppError,
    input::{self, FileUpload},
    pipeline::Analysis,
};

use super::AppState;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "text_file";

type PageResult = Result<Html<String>, AppError>;

pub async fn index() -> PageResult {
    render(&IndexPage)
}

pub async fn extract_entities(
    State(state): State<AppState>,
    Form(form): Form<TextForm>,
) -> PageResult {
    let text = input::text_from_form(&form.text)?;
    let pipeline = state.pipeline.clone();
    let analysis = run_blocking(move || pipeline.process(&text)).await?;
    render_result(&analysis)
}

pub async fn predict_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PageResult {
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await?,
        Err(rejection) => {
            warn!(%rejection, "request is not multipart");
            None
        }
    };
    let upload_dir = state.settings.upload_dir.clone();
    let pipeline = state.pipeline.clone();
    let analysis = run_blocking(move || {
        let text = input::save_and_read(upload, &upload_dir)?;
        pipeline.process(&text)
    })
    .await?;
    render_result(&analysis)
}

/// Serve a generated image as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if input::sanitize_filename(&filename).as_deref() != Some(filename.as_str()) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }
    let path = state.settings.join_static(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StatusCode::NOT_FOUND.into_response());
        }
        Err(err) => return Err(err.into()),
    };
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let headers = [
        (header::CONTENT_TYPE, mime.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Entities, label groups and frequencies as JSON, without images.
pub async fn entities_json(
    State(state): State<AppState>,
    Json(payload): Json<TextForm>,
) -> Result<Json<EntitiesResponse>, AppError> {
    let text = input::text_from_form(&payload.text)?;
    let pipeline = state.pipeline.clone();
    let entities = run_blocking(move || Ok(pipeline.extract(&text))).await?;
    Ok(Json(EntitiesResponse::new(entities)))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<FileUpload>, AppError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!(%err, "unreadable multipart body");
                return Ok(None);
            }
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|err| {
            warn!(%err, "upload body truncated");
            AppError::MissingFile
        })?;
        return Ok(Some(FileUpload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }
}

/// Run pipeline work off the async executor; a request is one synchronous pass.
async fn run_blocking<T, F>(job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| AppError::Internal(err.into()))?
}

fn render_result(analysis: &Analysis) -> PageResult {
    render(&ResultPage::from(analysis))
}

fn render<T: Template>(page: &T) -> PageResult {
    page.render()
        .map(Html)
        .map_err(|err| AppError::Internal(err.into()))
}
