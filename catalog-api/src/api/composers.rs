//! Composer CRUD handlers
//!
//! Every handler follows the same sequence: its extractors validate the
//! input (400 on failure), the body runs one store operation, and any
//! store failure is translated by [`crate::ApiError`].

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use catalog_common::Composer;
use tracing::info;

use super::extract::{AppendedWorks, ComposerBody, ComposerId, ListParams};
use crate::error::ApiResult;
use crate::AppState;

/// GET /composers
///
/// Filtered, sorted, then sliced to the requested page. Empty array when
/// nothing matches.
pub async fn list_composers(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> ApiResult<Json<Vec<Composer>>> {
    let composers = state.store.list(&query.filter, query.sort).await?;
    Ok(Json(query.page.apply(composers)))
}

/// GET /composers/:id
pub async fn get_composer(
    State(state): State<AppState>,
    ComposerId(id): ComposerId,
) -> ApiResult<Json<Composer>> {
    let composer = state.store.get_by_id(id).await?;
    Ok(Json(composer))
}

/// POST /composers
pub async fn create_composer(
    State(state): State<AppState>,
    ComposerBody(draft): ComposerBody,
) -> ApiResult<(StatusCode, Json<Composer>)> {
    let composer = state.store.create(&draft).await?;
    info!(composer_id = %composer.id, name = %composer.name, "Created composer");
    Ok((StatusCode::CREATED, Json(composer)))
}

/// PUT /composers/:id
pub async fn update_composer(
    State(state): State<AppState>,
    ComposerId(id): ComposerId,
    ComposerBody(draft): ComposerBody,
) -> ApiResult<Json<Composer>> {
    let composer = state.store.update_by_id(id, &draft).await?;
    info!(composer_id = %id, "Updated composer");
    Ok(Json(composer))
}

/// DELETE /composers/:id
pub async fn delete_composer(
    State(state): State<AppState>,
    ComposerId(id): ComposerId,
) -> ApiResult<StatusCode> {
    let deleted = state.store.delete_by_id(id).await?;
    info!(composer_id = %id, name = %deleted.name, "Deleted composer");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /composers/:id/notableworks
pub async fn append_notable_works(
    State(state): State<AppState>,
    ComposerId(id): ComposerId,
    AppendedWorks(items): AppendedWorks,
) -> ApiResult<Json<Composer>> {
    let composer = state.store.append_notable_works(id, &items).await?;
    Ok(Json(composer))
}

/// Build composer routes, relative to the mount point
pub fn composer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_composers).post(create_composer))
        .route(
            "/:id",
            get(get_composer).put(update_composer).delete(delete_composer),
        )
        .route("/:id/notableworks", put(append_notable_works))
}
