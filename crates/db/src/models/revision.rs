//! Append-only revision audit records.

use serde::Serialize;
use sqlx::FromRow;

use folio_core::types::{DbId, Timestamp};

/// A row from the `project_revisions` table. Never mutated after insert;
/// one is appended per successful project create or update.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRevision {
    pub id: i64,
    pub project_id: DbId,
    pub version: i32,
    /// Subject id of the acting caller, when the request was authenticated.
    pub actor_id: Option<String>,
    pub summary: String,
    pub created_at: Timestamp,
}
