//! Repository for the append-only `project_revisions` table.

use sqlx::{PgPool, Postgres, Transaction};

use folio_core::types::DbId;

use crate::models::revision::ProjectRevision;

/// Column list for the `project_revisions` table.
const COLUMNS: &str = "id, project_id, version, actor_id, summary, created_at";

pub struct RevisionRepo;

impl RevisionRepo {
    /// Append one revision row within an existing transaction.
    ///
    /// Called by [`crate::repositories::ProjectRepo`] as the final step of
    /// every create and update, so the revision commits (or rolls back)
    /// atomically with the aggregate change.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        version: i32,
        actor_id: Option<&str>,
        summary: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_revisions (project_id, version, actor_id, summary) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(project_id)
        .bind(version)
        .bind(actor_id)
        .bind(summary)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// List all revisions for a project, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectRevision>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM project_revisions WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, ProjectRevision>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
