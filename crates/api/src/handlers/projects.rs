//! Handlers for the `/projects` resource.
//!
//! Reads are unauthenticated; mutating handlers gate on role extractors
//! and thread the verified [`AuthContext`] into the repository layer for
//! revision attribution. Validation runs fully before any store access.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::project::{
    CreateProject, ProjectFilter, ProjectSummary, ReorderRequest, UpdateProject,
};
use folio_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireEditor};
use crate::state::AppState;

/// Default page size for the list endpoint.
const DEFAULT_PAGE_SIZE: i64 = 12;

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub query: Option<String>,
    pub tag: Option<String>,
}

/// Response body for `GET /projects`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<ProjectSummary>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

/// Acknowledgement body for `PATCH /projects/{id}/reorder`.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /projects?page=&pageSize=&query=&tag=
///
/// Paginated summary listing ordered by `updatedAt` descending. `query`
/// is a case-insensitive substring match over title/summary/description;
/// `tag` filters by tag membership.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, 50);

    let filter = ProjectFilter {
        page,
        page_size,
        query: params.query,
        tag: params.tag,
    };
    let (items, total) = ProjectRepo::list(&state.pool, &filter).await?;

    Ok(Json(ListResponse {
        items,
        page,
        page_size,
        total,
    }))
}

/// GET /projects/{slug}
///
/// Full aggregate with every child collection ordered ascending by `order`.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let detail = ProjectRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                key: slug,
            })
        })?;
    Ok(Json(detail))
}

/// POST /projects (editor/admin)
///
/// Create a project aggregate. 400 on validation failure, 409 when the
/// slug is already taken. Returns the root fields with 201.
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(ctx): RequireEditor,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if ProjectRepo::find_root_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Slug already exists".into(),
        )));
    }

    let project = ProjectRepo::create(&state.pool, &input, Some(&ctx.subject_id)).await?;
    tracing::info!(project_id = %project.id, slug = %project.slug, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /projects/{id} (editor/admin)
///
/// Partial update: absent root fields keep their stored value, and only
/// child collections present in the payload are replaced. The stored
/// version is incremented server-side regardless of any payload version.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(ctx): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let existing = ProjectRepo::find_root_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "Project",
            key: id.to_string(),
        }))?;

    if let Some(slug) = &input.slug {
        if *slug != existing.slug
            && ProjectRepo::find_root_by_slug(&state.pool, slug)
                .await?
                .is_some()
        {
            return Err(AppError::Core(CoreError::Conflict(
                "Slug already exists".into(),
            )));
        }
    }

    let project = ProjectRepo::update(&state.pool, id, &input, Some(&ctx.subject_id))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "Project",
            key: id.to_string(),
        }))?;
    tracing::info!(project_id = %project.id, version = project.version, "Project updated");
    Ok(Json(project))
}

/// PATCH /projects/{id}/reorder (admin)
///
/// Batch `order` update across the aggregate's child collections, applied
/// atomically. A pair referencing a record not owned by this project
/// fails the whole batch.
pub async fn reorder(
    State(state): State<AppState>,
    RequireAdmin(_ctx): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<AckResponse>> {
    if ProjectRepo::find_root_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            key: id.to_string(),
        }));
    }

    let applied = ProjectRepo::reorder(&state.pool, id, &input).await?;
    if !applied {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Child record",
            key: format!("in reorder batch for project {id}"),
        }));
    }
    Ok(Json(AckResponse { ok: true }))
}

/// DELETE /projects/{id} (admin)
///
/// Hard delete; children and revisions cascade. Deleting an unknown id is
/// a 404, not a no-op success.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_ctx): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = %id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            key: id.to_string(),
        }))
    }
}
