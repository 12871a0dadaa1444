use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// GET reads by slug; PUT/DELETE address the project by id, so the shared
/// `{key}` segment is decoded per-method by each handler's `Path` type.
///
/// ```text
/// GET    /               -> list                (public)
/// POST   /               -> create              (editor, admin)
/// GET    /{key}          -> get_by_slug         (public)
/// PUT    /{key}          -> update              (editor, admin)
/// DELETE /{key}          -> delete              (admin)
/// PATCH  /{key}/reorder  -> reorder             (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{key}",
            get(projects::get_by_slug)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{key}/reorder", patch(projects::reorder))
}
