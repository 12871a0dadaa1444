//! Repository for the project aggregate: the `projects` root table and its
//! five owned child collections.
//!
//! Every mutating method runs as one transaction: either all child
//! replacements and the revision append succeed, or none do. Child
//! collections use replace-all semantics on update; a collection absent
//! from the payload is left untouched.

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use folio_core::types::DbId;

use crate::models::project::{
    CodeSnippet, CodeSnippetInput, CreateProject, DetailSection, DetailSectionInput,
    DetailSectionWithSnippets, GalleryItem, GalleryItemInput, LinkInput, MetricInput, Project,
    ProjectDetail, ProjectFilter, ProjectLink, ProjectMetric, ProjectSummary, ReorderPair,
    ReorderRequest, UpdateProject,
};
use crate::repositories::RevisionRepo;

/// Column list for the `projects` table.
const PROJECT_COLUMNS: &str = "id, slug, title, category, description, long_description, \
    summary, content, tech, tags, highlights, timeline, team, status, version, \
    created_at, updated_at";

/// Column list for the paginated summary view.
const SUMMARY_COLUMNS: &str = "id, title, slug, summary, tags, status, updated_at";

/// Shared filter clause for list/count. `$1` is the optional search term,
/// `$2` the optional tag.
const LIST_WHERE: &str = "($1::text IS NULL \
        OR title ILIKE '%' || $1 || '%' \
        OR summary ILIKE '%' || $1 || '%' \
        OR description ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR $2 = ANY(tags))";

/// Escape LIKE metacharacters so a bound search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub struct ProjectRepo;

impl ProjectRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Paginated summary listing, newest-updated first.
    ///
    /// `page` is clamped to `>= 1` and `page_size` to `[1, 50]`. Returns the
    /// page of summaries together with the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
    ) -> Result<(Vec<ProjectSummary>, i64), sqlx::Error> {
        let page = filter.page.max(1);
        let page_size = filter.page_size.clamp(1, 50);
        let term = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(escape_like);
        let tag = filter
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let page_query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM projects \
             WHERE {LIST_WHERE} \
             ORDER BY updated_at DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, ProjectSummary>(&page_query)
            .bind(&term)
            .bind(tag)
            .bind(page_size)
            // page is user-supplied; saturate instead of overflowing.
            .bind((page - 1).saturating_mul(page_size))
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM projects WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(term)
            .bind(tag)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Fetch root fields by id.
    pub async fn find_root_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch root fields by slug.
    pub async fn find_root_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the full aggregate by slug, every child collection ordered
    /// ascending by `sort_order`.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_root_by_slug(pool, slug).await? else {
            return Ok(None);
        };

        let links = Self::links_for_project(pool, project.id).await?;
        let metrics = Self::metrics_for_project(pool, project.id).await?;
        let gallery = Self::gallery_for_project(pool, project.id).await?;
        let sections = Self::sections_for_project(pool, project.id).await?;

        let mut detail_sections = Vec::with_capacity(sections.len());
        for section in sections {
            let code_snippets = Self::snippets_for_section(pool, section.id).await?;
            detail_sections.push(DetailSectionWithSnippets {
                section,
                code_snippets,
            });
        }

        Ok(Some(ProjectDetail {
            project,
            links,
            metrics,
            gallery,
            detail_sections,
        }))
    }

    /// All links for a project, ordered ascending.
    pub async fn links_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectLink>, sqlx::Error> {
        sqlx::query_as::<_, ProjectLink>(
            "SELECT id, project_id, label, url, sort_order FROM project_links \
             WHERE project_id = $1 ORDER BY sort_order",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// All metrics for a project, ordered ascending.
    pub async fn metrics_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMetric>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMetric>(
            "SELECT id, project_id, label, value, sort_order FROM project_metrics \
             WHERE project_id = $1 ORDER BY sort_order",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// All gallery items for a project, ordered ascending.
    pub async fn gallery_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<GalleryItem>, sqlx::Error> {
        sqlx::query_as::<_, GalleryItem>(
            "SELECT id, project_id, src, alt, caption, sort_order FROM project_gallery \
             WHERE project_id = $1 ORDER BY sort_order",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// All detail sections for a project, ordered ascending.
    pub async fn sections_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DetailSection>, sqlx::Error> {
        sqlx::query_as::<_, DetailSection>(
            "SELECT id, project_id, heading, body, bullets, image, sort_order \
             FROM detail_sections WHERE project_id = $1 ORDER BY sort_order",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// All code snippets for a section, ordered ascending.
    pub async fn snippets_for_section(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Vec<CodeSnippet>, sqlx::Error> {
        sqlx::query_as::<_, CodeSnippet>(
            "SELECT id, section_id, title, language, code, sort_order FROM code_snippets \
             WHERE section_id = $1 ORDER BY sort_order",
        )
        .bind(section_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a project aggregate and append its "Initial create" revision,
    /// all in one transaction. Child `order` defaults to array position.
    ///
    /// The caller is expected to have checked slug availability; the unique
    /// constraint `uq_projects_slug` backstops a concurrent create.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        actor_id: Option<&str>,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO projects \
                (id, slug, title, category, description, long_description, summary, \
                 content, tech, tags, highlights, timeline, team, status, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {PROJECT_COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&insert_query)
            .bind(Uuid::now_v7())
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.tech)
            .bind(&input.tags)
            .bind(&input.highlights)
            .bind(&input.timeline)
            .bind(&input.team)
            .bind(&input.status)
            .bind(input.version)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_links(&mut tx, project.id, &input.links).await?;
        Self::insert_metrics(&mut tx, project.id, &input.metrics).await?;
        Self::insert_gallery(&mut tx, project.id, &input.gallery).await?;
        Self::insert_sections(&mut tx, project.id, &input.detail_sections).await?;

        RevisionRepo::append(&mut tx, project.id, project.version, actor_id, "Initial create")
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Apply a partial update: merge supplied root fields over stored values,
    /// bump `version` by one server-side, replace each child collection that
    /// is present in the payload, and append an "Update" revision. One
    /// transaction; a collection absent from the payload is left untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
        actor_id: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE projects SET \
                slug = COALESCE($2, slug), \
                title = COALESCE($3, title), \
                category = COALESCE($4, category), \
                description = COALESCE($5, description), \
                long_description = COALESCE($6, long_description), \
                summary = COALESCE($7, summary), \
                content = COALESCE($8::text[], content), \
                tech = COALESCE($9::text[], tech), \
                tags = COALESCE($10::text[], tags), \
                highlights = COALESCE($11::text[], highlights), \
                timeline = COALESCE($12, timeline), \
                team = COALESCE($13, team), \
                status = COALESCE($14, status), \
                version = version + 1, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {PROJECT_COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&update_query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.tech)
            .bind(&input.tags)
            .bind(&input.highlights)
            .bind(&input.timeline)
            .bind(&input.team)
            .bind(&input.status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = project else {
            return Ok(None);
        };

        if let Some(links) = &input.links {
            sqlx::query("DELETE FROM project_links WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_links(&mut tx, id, links).await?;
        }
        if let Some(metrics) = &input.metrics {
            sqlx::query("DELETE FROM project_metrics WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_metrics(&mut tx, id, metrics).await?;
        }
        if let Some(gallery) = &input.gallery {
            sqlx::query("DELETE FROM project_gallery WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_gallery(&mut tx, id, gallery).await?;
        }
        if let Some(sections) = &input.detail_sections {
            // Cascade removes the sections' snippets.
            sqlx::query("DELETE FROM detail_sections WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_sections(&mut tx, id, sections).await?;
        }

        RevisionRepo::append(&mut tx, id, project.version, actor_id, "Update").await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Apply a batch of per-record `order` updates in one transaction.
    ///
    /// Every pair must reference a child record owned by `project_id`
    /// (snippets via their parent section); a pair referencing a missing or
    /// foreign record rolls back the whole batch and returns `false`. No
    /// version bump, no revision.
    pub async fn reorder(
        pool: &PgPool,
        project_id: DbId,
        req: &ReorderRequest,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let direct: [(&str, &Option<Vec<ReorderPair>>); 4] = [
            ("project_links", &req.links),
            ("project_metrics", &req.metrics),
            ("project_gallery", &req.gallery),
            ("detail_sections", &req.detail_sections),
        ];
        for (table, pairs) in direct {
            let Some(pairs) = pairs else { continue };
            let query = format!(
                "UPDATE {table} SET sort_order = $1 WHERE id = $2 AND project_id = $3"
            );
            for pair in pairs {
                let result = sqlx::query(&query)
                    .bind(pair.order)
                    .bind(pair.id)
                    .bind(project_id)
                    .execute(&mut *tx)
                    .await?;
                if result.rows_affected() == 0 {
                    tx.rollback().await?;
                    return Ok(false);
                }
            }
        }

        if let Some(pairs) = &req.code_snippets {
            for pair in pairs {
                let result = sqlx::query(
                    "UPDATE code_snippets SET sort_order = $1 \
                     WHERE id = $2 AND section_id IN \
                        (SELECT id FROM detail_sections WHERE project_id = $3)",
                )
                .bind(pair.order)
                .bind(pair.id)
                .bind(project_id)
                .execute(&mut *tx)
                .await?;
                if result.rows_affected() == 0 {
                    tx.rollback().await?;
                    return Ok(false);
                }
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Hard-delete a project; child collections, snippets, and revisions go
    /// with it via cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn insert_links(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        links: &[LinkInput],
    ) -> Result<(), sqlx::Error> {
        for (i, link) in links.iter().enumerate() {
            sqlx::query(
                "INSERT INTO project_links (id, project_id, label, url, sort_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::now_v7())
            .bind(project_id)
            .bind(&link.label)
            .bind(&link.url)
            .bind(link.order.unwrap_or(i as i32))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_metrics(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        metrics: &[MetricInput],
    ) -> Result<(), sqlx::Error> {
        for (i, metric) in metrics.iter().enumerate() {
            sqlx::query(
                "INSERT INTO project_metrics (id, project_id, label, value, sort_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::now_v7())
            .bind(project_id)
            .bind(&metric.label)
            .bind(&metric.value)
            .bind(metric.order.unwrap_or(i as i32))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_gallery(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        gallery: &[GalleryItemInput],
    ) -> Result<(), sqlx::Error> {
        for (i, item) in gallery.iter().enumerate() {
            sqlx::query(
                "INSERT INTO project_gallery (id, project_id, src, alt, caption, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::now_v7())
            .bind(project_id)
            .bind(&item.src)
            .bind(&item.alt)
            .bind(&item.caption)
            .bind(item.order.unwrap_or(i as i32))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_sections(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        sections: &[DetailSectionInput],
    ) -> Result<(), sqlx::Error> {
        for (i, section) in sections.iter().enumerate() {
            let section_id = Uuid::now_v7();
            sqlx::query(
                "INSERT INTO detail_sections \
                    (id, project_id, heading, body, bullets, image, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(section_id)
            .bind(project_id)
            .bind(&section.heading)
            .bind(&section.body)
            .bind(section.bullets.clone().unwrap_or_default())
            .bind(section.image.clone().map(Json))
            .bind(section.order.unwrap_or(i as i32))
            .execute(&mut **tx)
            .await?;

            if let Some(snippets) = &section.code_snippets {
                Self::insert_snippets(tx, section_id, snippets).await?;
            }
        }
        Ok(())
    }

    async fn insert_snippets(
        tx: &mut Transaction<'_, Postgres>,
        section_id: DbId,
        snippets: &[CodeSnippetInput],
    ) -> Result<(), sqlx::Error> {
        for (i, snippet) in snippets.iter().enumerate() {
            sqlx::query(
                "INSERT INTO code_snippets (id, section_id, title, language, code, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::now_v7())
            .bind(section_id)
            .bind(&snippet.title)
            .bind(&snippet.language)
            .bind(&snippet.code)
            .bind(snippet.order.unwrap_or(i as i32))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
