//! Media API module for the Parley HTTP API.
//!
//! Media is embedded directly into messages as base64 data URIs; there is
//! no content-addressed storage. An upload stages an attachment on the
//! active draft, and the draft endpoint hands the staged previews to the
//! front end when a repaint is due.

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use tracing::{debug, instrument};

use parley_core::constants::{ALLOWED_EXTENSIONS, MAX_UPLOAD_SIZE};
use parley_core::{MediaAttachment, MediaKind};

use crate::session::with_session;
use crate::ApiError;

/// Media API router.
pub fn router() -> Router {
    Router::new()
        .route("/upload", post(upload_media))
        .route("/draft", get(draft_previews))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub ok: bool,
    pub file_name: String,
    pub status: String,
}

/// A staged attachment rendered for the front end.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPreview {
    pub kind: MediaKind,
    pub src: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMediaResponse {
    pub items: Vec<MediaPreview>,
}

// ==================== Handlers ====================

#[instrument(skip_all)]
async fn upload_media(mut multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut description = String::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes.to_vec()));
            }
            Some("description") => {
                description = field.text().await?;
            }
            _ => {}
        }
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::InvalidRequest("missing 'file' form field".to_string()))?;

    if bytes.len() > MAX_UPLOAD_SIZE {
        return Err(ApiError::InvalidRequest(format!(
            "file {} exceeds the {} byte upload limit",
            file_name, MAX_UPLOAD_SIZE
        )));
    }

    let ext = FsPath::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let content_type = MediaKind::data_uri_prefix(&ext).ok_or_else(|| {
        ApiError::InvalidRequest(format!(
            "file {} not allowed (accepted extensions: {})",
            file_name,
            ALLOWED_EXTENSIONS.join(", ")
        ))
    })?;

    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    let attachment = MediaAttachment::new(content_type, data, description);
    debug!(media = %attachment.id, file = %file_name, bytes = bytes.len(), "media encoded");

    with_session(|session| session.stage_media(attachment)).await?;

    Ok(Json(UploadResponse {
        ok: true,
        status: format!("File {} uploaded OK. Add the next file or close the tab.", file_name),
        file_name,
    }))
}

/// Returns the staged draft attachments once per repaint flag,
/// `204 No Content` otherwise.
#[instrument(skip_all)]
async fn draft_previews() -> Result<Response, ApiError> {
    let media = with_session(|session| session.draft_media()).await?;
    match media {
        Some(media) => {
            let items = media.iter().map(preview_for).collect();
            Ok(Json(DraftMediaResponse { items }).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

fn preview_for(attachment: &MediaAttachment) -> MediaPreview {
    MediaPreview {
        kind: attachment.kind(),
        src: attachment.data_uri(),
        description: attachment.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_carries_kind_and_data_uri() {
        let attachment =
            MediaAttachment::new("data:image/png;base64", "iVBORw0KGgo=", "shot.png");
        let preview = preview_for(&attachment);
        assert_eq!(preview.kind, MediaKind::Image);
        assert_eq!(preview.src, "data:image/png;base64, iVBORw0KGgo=");
        assert_eq!(preview.description, "shot.png");
    }

    #[test]
    fn disallowed_extension_has_no_content_type() {
        assert!(MediaKind::data_uri_prefix("exe").is_none());
        assert!(MediaKind::data_uri_prefix("").is_none());
    }
}
