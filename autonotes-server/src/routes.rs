//! Axum route handlers for the Autonotes API.
//!
//! Every handler resolves the caller's namespace from the `comfy-user`
//! header and opens a fresh [`NoteStore`] on tokio's blocking pool, so each
//! request sees what is on disk right now without stalling the runtime.

use crate::types::*;
use autonotes_core::{AutonotesError, Folder, FolderPatch, Namespace, Note, NotePatch, NoteStore};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Header carrying the editor's current user.
pub const USER_HEADER: &str = "comfy-user";

const FOLDER_NOT_FOUND: &str = "Folder not found";

pub struct AppState {
    pub data_dir: PathBuf,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            start_time: Instant::now(),
        }
    }
}

/// An error that aborts a request, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<AutonotesError> for ApiError {
    fn from(e: AutonotesError) -> Self {
        let status = match e {
            AutonotesError::InvalidNamespace(_) => StatusCode::BAD_REQUEST,
            AutonotesError::Io(_) | AutonotesError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::error!("Request failed: {e}");
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("Request failed: {message}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

/// Opens the caller's store and runs `f` on the blocking pool.
async fn with_store<T, F>(state: &AppState, headers: &HeaderMap, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut NoteStore) -> autonotes_core::Result<T> + Send + 'static,
{
    let user = headers.get(USER_HEADER).and_then(|v| v.to_str().ok());
    let namespace = Namespace::resolve(user)?;
    let data_dir = state.data_dir.clone();

    let result = tokio::task::spawn_blocking(move || {
        let mut store = NoteStore::open(&data_dir, &namespace)?;
        f(&mut store)
    })
    .await
    .map_err(|e| ApiError::internal(format!("store task failed: {e}")))?;
    Ok(result?)
}

fn folder_not_found() -> (StatusCode, Json<SuccessResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(SuccessResponse::err(FOLDER_NOT_FOUND)),
    )
}

// GET /autonotes/notes
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NotesQuery>,
) -> ApiResult<Json<Vec<Note>>> {
    let mode = query.display_mode();
    let context = query.context();
    let notes: Vec<Note> = with_store(&state, &headers, move |store| {
        Ok(store
            .notes_for_display(mode, &context)
            .into_iter()
            .cloned()
            .collect())
    })
    .await?;
    Ok(Json(notes))
}

// POST /autonotes/notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let name = req.name.unwrap_or_else(|| DEFAULT_NOTE_NAME.to_string());
    let uuid = with_store(&state, &headers, move |store| {
        store.create_note(&name, req.folder_uuid)
    })
    .await?;
    Ok(Json(CreatedResponse { uuid }))
}

// PUT /autonotes/notes/:note_uuid
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(note_uuid): Path<String>,
    Json(patch): Json<NotePatch>,
) -> ApiResult<Json<SuccessResponse>> {
    let success =
        with_store(&state, &headers, move |store| store.update_note(&note_uuid, patch)).await?;
    Ok(Json(SuccessResponse::ok(success)))
}

// DELETE /autonotes/notes/:note_uuid
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(note_uuid): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let success = with_store(&state, &headers, move |store| store.delete_note(&note_uuid)).await?;
    Ok(Json(SuccessResponse::ok(success)))
}

// GET /autonotes/folders
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Folder>>> {
    let folders = with_store(&state, &headers, |store| Ok(store.folders().to_vec())).await?;
    Ok(Json(folders))
}

// POST /autonotes/folders
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let name = req.name.unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());
    let uuid = with_store(&state, &headers, move |store| {
        store.create_folder(&name, req.parent_uuid)
    })
    .await?;
    Ok(Json(CreatedResponse { uuid }))
}

// PUT /autonotes/folders/:folder_uuid
pub async fn update_folder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(folder_uuid): Path<String>,
    Json(patch): Json<FolderPatch>,
) -> ApiResult<(StatusCode, Json<SuccessResponse>)> {
    let found =
        with_store(&state, &headers, move |store| store.update_folder(&folder_uuid, patch)).await?;
    if !found {
        return Ok(folder_not_found());
    }
    Ok((StatusCode::OK, Json(SuccessResponse::ok(true))))
}

// DELETE /autonotes/folders/:folder_uuid
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(folder_uuid): Path<String>,
) -> ApiResult<(StatusCode, Json<SuccessResponse>)> {
    let found = with_store(&state, &headers, move |store| store.delete_folder(&folder_uuid)).await?;
    if !found {
        return Ok(folder_not_found());
    }
    Ok((StatusCode::OK, Json(SuccessResponse::ok(true))))
}

// GET /autonotes/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
