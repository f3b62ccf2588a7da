//! Image upload and listing
//!
//! Images live in `<static_dir>/images` and are referenced from links and
//! engines by the relative path `images/<file>`.

use std::fs;
use std::io;
use std::path::Path;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use super::{
    error::{ApiError, Result},
    AppState,
};

const ALLOWED_EXTENSIONS: &[&str] = &["webp", "png", "jpg", "jpeg", "gif"];

/// `GET /images-list`
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let names = image_names(&state.images_dir())
        .map_err(|e| ApiError::Internal(format!("Failed to list images: {}", e)))?;
    Ok(Json(
        names.into_iter().map(|name| format!("images/{}", name)).collect(),
    ))
}

/// `POST /upload` with a multipart `file` field
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        if original.is_empty() {
            return Err(ApiError::InvalidRequest("No selected file".to_string()));
        }
        if !allowed_file(&original) {
            return Err(ApiError::InvalidRequest("Invalid file type".to_string()));
        }
        let filename = secure_filename(&original)
            .ok_or_else(|| ApiError::InvalidRequest("Invalid file name".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

        let images_dir = state.images_dir();
        fs::create_dir_all(&images_dir)
            .and_then(|()| fs::write(images_dir.join(&filename), &data))
            .map_err(|e| ApiError::Internal(format!("Failed to save {}: {}", filename, e)))?;
        info!(file = %filename, bytes = data.len(), "Uploaded image");

        return Ok((
            StatusCode::CREATED,
            Json(json!({"message": "File uploaded", "path": format!("images/{}", filename)})),
        ));
    }

    Err(ApiError::InvalidRequest("No file part".to_string()))
}

/// File names in the image directory, sorted; empty if it does not exist
fn image_names(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn allowed_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce an uploaded file name to a safe, flat ASCII name
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading/trailing `.` and `_` are trimmed.
fn secure_filename(name: &str) -> Option<String> {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
