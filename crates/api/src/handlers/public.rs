//! Handlers for the anonymous share-token surface.
//!
//! No authentication: the share token in the path is the entire
//! capability, and everything served here is read-only and client-safe.

use axum::extract::{Path, State};
use axum::Json;

use pulseboard_sync::{service, ProjectDetail, PublicScope};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/projects/{public_id}
///
/// One-shot read of the shared project, its tasks, and current progress.
/// Unknown tokens are 404 -- whether similar tokens exist is not observable.
pub async fn get_detail(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let scope = PublicScope::for_token(public_id);
    let detail = service::public_detail(&state.store, &scope).await?;
    Ok(Json(DataResponse { data: detail }))
}
