//! HTTP service for Autonotes.
//!
//! Exposes note and folder CRUD plus context-filtered note listing to the
//! workflow editor's front-end. See [`router`] for the routes.

pub mod config;
pub mod routes;
pub mod types;

use axum::routing::get;
use routes::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the Autonotes API router.
///
/// | route | methods |
/// |---|---|
/// | `/autonotes/notes` | `GET` (list, filtered by `mode` and context), `POST` |
/// | `/autonotes/notes/:note_uuid` | `PUT`, `DELETE` |
/// | `/autonotes/folders` | `GET`, `POST` |
/// | `/autonotes/folders/:folder_uuid` | `PUT`, `DELETE` |
/// | `/autonotes/status` | `GET` |
pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/autonotes/notes",
            get(routes::list_notes).post(routes::create_note),
        )
        .route(
            "/autonotes/notes/:note_uuid",
            axum::routing::put(routes::update_note).delete(routes::delete_note),
        )
        .route(
            "/autonotes/folders",
            get(routes::list_folders).post(routes::create_folder),
        )
        .route(
            "/autonotes/folders/:folder_uuid",
            axum::routing::put(routes::update_folder).delete(routes::delete_folder),
        )
        .route("/autonotes/status", get(routes::status))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
