// ============================
// crates/backend-lib/src/handlers/files.rs
// ============================
//! File operations. Every route here sits behind the session guard.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    Extension, Json,
};
use batcloud_common::{
    CreateFolderRequest, CreateFolderResponse, DeleteFileRequest, ListFilesResponse,
    SuccessResponse, UploadResponse,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::metrics;
use crate::storage::FileStore;
use crate::AppState;

/// Query string of the list route
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub parent_id: Option<String>,
}

/// `GET /api/list-files`
pub async fn list_files<S: FileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListFilesResponse>, AppError> {
    let files = state.storage.list(params.parent_id.as_deref()).await?;
    Ok(Json(ListFilesResponse { files }))
}

/// `POST /api/upload-file`
///
/// Expects a multipart form with a `file` part and an optional `parentId` part.
pub async fn upload_file<S: FileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut parent_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let part = field.name().map(str::to_string);
        match part.as_deref() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "untitled".to_string());
                let contents = field.bytes().await?;
                upload = Some((name, contents));
            },
            Some("parentId") => {
                parent_id = Some(field.text().await?).filter(|p| !p.is_empty());
            },
            _ => {},
        }
    }

    let (name, contents) =
        upload.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    let file = state
        .storage
        .upload(parent_id.as_deref(), &name, &contents)
        .await?;

    ::metrics::counter!(metrics::FILES_UPLOADED).increment(1);
    ::metrics::counter!(metrics::FILES_UPLOADED_BYTES).increment(file.size);
    info!(user = %user.username, id = %file.id, size = file.size, "file uploaded");

    Ok(Json(UploadResponse { success: true, file }))
}

/// `DELETE /api/delete-file`
pub async fn delete_file<S: FileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let request: DeleteFileRequest = parse_body(&body)?;
    let file_id = request
        .file_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("File ID is required".to_string()))?;

    state.storage.delete(&file_id).await?;

    ::metrics::counter!(metrics::FILES_DELETED).increment(1);
    info!(user = %user.username, id = %file_id, "entry deleted");

    Ok(Json(SuccessResponse::default()))
}

/// `POST /api/create-folder`
pub async fn create_folder<S: FileStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Json<CreateFolderResponse>, AppError> {
    let request: CreateFolderRequest = parse_body(&body)?;
    let folder_name = request
        .folder_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Folder name is required".to_string()))?;

    let folder = state
        .storage
        .create_folder(request.parent_id.as_deref(), &folder_name)
        .await?;

    ::metrics::counter!(metrics::FOLDERS_CREATED).increment(1);
    info!(user = %user.username, id = %folder.id, "folder created");

    Ok(Json(CreateFolderResponse { success: true, folder }))
}

/// An empty body counts as `{}`.
fn parse_body<T: serde::de::DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|_| AppError::InvalidInput("Invalid request body".to_string()))
}
