//! Project aggregate models: the root row, the five owned child
//! collections, and the create/update/reorder request DTOs.
//!
//! The validation limits mirror the public API contract exactly; see the
//! `Validate` attributes on the DTOs. Wire JSON is camelCase and the
//! `sort_order` column is exposed as `order`.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use folio_core::status::STATUS_DRAFT;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::{non_empty_strings, valid_status, SLUG_RE};

// ---------------------------------------------------------------------------
// Row models
// ---------------------------------------------------------------------------

/// A row from the `projects` table (root fields only).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub summary: Option<String>,
    pub content: Vec<String>,
    pub tech: Vec<String>,
    pub tags: Vec<String>,
    pub highlights: Vec<String>,
    pub timeline: Option<String>,
    pub team: Option<String>,
    pub status: String,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Summary view returned by the paginated list endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub updated_at: Timestamp,
}

/// A row from the `project_links` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLink {
    pub id: DbId,
    pub project_id: DbId,
    pub label: String,
    pub url: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// A row from the `project_metrics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetric {
    pub id: DbId,
    pub project_id: DbId,
    pub label: String,
    pub value: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// A row from the `project_gallery` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: DbId,
    pub project_id: DbId,
    pub src: String,
    pub alt: String,
    pub caption: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// Optional illustration attached to a detail section (stored as JSONB).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DetailImage {
    #[validate(url, length(max = 2048))]
    pub src: String,
    #[validate(length(min = 1, max = 160))]
    pub alt: String,
    #[validate(length(max = 240))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A row from the `detail_sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSection {
    pub id: DbId,
    pub project_id: DbId,
    pub heading: String,
    pub body: Vec<String>,
    pub bullets: Vec<String>,
    pub image: Option<Json<DetailImage>>,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// A row from the `code_snippets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub id: DbId,
    pub section_id: DbId,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

/// A detail section enriched with its code snippets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSectionWithSnippets {
    #[serde(flatten)]
    pub section: DetailSection,
    pub code_snippets: Vec<CodeSnippet>,
}

/// The full project aggregate: root fields plus every child collection,
/// each ordered ascending by `order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub links: Vec<ProjectLink>,
    pub metrics: Vec<ProjectMetric>,
    pub gallery: Vec<GalleryItem>,
    pub detail_sections: Vec<DetailSectionWithSnippets>,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

fn default_status() -> String {
    STATUS_DRAFT.to_string()
}

fn default_version() -> i32 {
    1
}

/// Child link payload. `order` defaults to the array position when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkInput {
    #[validate(length(min = 1, max = 60))]
    pub label: String,
    #[validate(url, length(max = 2048))]
    pub url: String,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

/// Child metric payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetricInput {
    #[validate(length(min = 1, max = 60))]
    pub label: String,
    #[validate(length(min = 1, max = 120))]
    pub value: String,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

/// Child gallery item payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemInput {
    #[validate(url, length(max = 2048))]
    pub src: String,
    #[validate(length(min = 1, max = 160))]
    pub alt: String,
    #[validate(length(max = 240))]
    pub caption: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

/// Child code snippet payload, owned by a detail section.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippetInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 40))]
    pub language: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

/// Child detail section payload, optionally carrying code snippets and an
/// illustration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DetailSectionInput {
    #[validate(length(min = 1, max = 140))]
    pub heading: String,
    #[validate(length(min = 1), custom(function = non_empty_strings))]
    pub body: Vec<String>,
    #[validate(custom(function = non_empty_strings))]
    pub bullets: Option<Vec<String>>,
    #[validate(nested)]
    pub code_snippets: Option<Vec<CodeSnippetInput>>,
    #[validate(nested)]
    pub image: Option<DetailImage>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

/// Payload for creating a project aggregate.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 3, max = 140))]
    pub title: String,
    #[validate(length(min = 3, max = 180), regex(path = *SLUG_RE))]
    pub slug: String,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(length(max = 20000))]
    pub long_description: Option<String>,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    #[validate(custom(function = non_empty_strings))]
    #[serde(default)]
    pub content: Vec<String>,
    #[validate(custom(function = non_empty_strings))]
    #[serde(default)]
    pub tech: Vec<String>,
    #[validate(custom(function = non_empty_strings))]
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(custom(function = non_empty_strings))]
    #[serde(default)]
    pub highlights: Vec<String>,
    #[validate(length(max = 120))]
    pub timeline: Option<String>,
    #[validate(length(max = 120))]
    pub team: Option<String>,
    #[validate(custom(function = valid_status))]
    #[serde(default = "default_status")]
    pub status: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_version")]
    pub version: i32,
    #[validate(nested)]
    #[serde(default)]
    pub links: Vec<LinkInput>,
    #[validate(nested)]
    #[serde(default)]
    pub metrics: Vec<MetricInput>,
    #[validate(nested)]
    #[serde(default)]
    pub gallery: Vec<GalleryItemInput>,
    #[validate(nested)]
    #[serde(default)]
    pub detail_sections: Vec<DetailSectionInput>,
}

/// Payload for updating a project aggregate.
///
/// Every field is optional: absent root fields keep their stored value,
/// and only child collections present in the payload are replaced. Any
/// client-supplied `version` is accepted but ignored; the stored version
/// is always incremented server-side.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 3, max = 140))]
    pub title: Option<String>,
    #[validate(length(min = 3, max = 180), regex(path = *SLUG_RE))]
    pub slug: Option<String>,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(length(max = 20000))]
    pub long_description: Option<String>,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    #[validate(custom(function = non_empty_strings))]
    pub content: Option<Vec<String>>,
    #[validate(custom(function = non_empty_strings))]
    pub tech: Option<Vec<String>>,
    #[validate(custom(function = non_empty_strings))]
    pub tags: Option<Vec<String>>,
    #[validate(custom(function = non_empty_strings))]
    pub highlights: Option<Vec<String>>,
    #[validate(length(max = 120))]
    pub timeline: Option<String>,
    #[validate(length(max = 120))]
    pub team: Option<String>,
    #[validate(custom(function = valid_status))]
    pub status: Option<String>,
    #[validate(range(min = 1))]
    pub version: Option<i32>,
    #[validate(nested)]
    pub links: Option<Vec<LinkInput>>,
    #[validate(nested)]
    pub metrics: Option<Vec<MetricInput>>,
    #[validate(nested)]
    pub gallery: Option<Vec<GalleryItemInput>>,
    #[validate(nested)]
    pub detail_sections: Option<Vec<DetailSectionInput>>,
}

/// One `{id, order}` pair in a reorder batch.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderPair {
    pub id: DbId,
    pub order: i32,
}

/// Batch order update for a project's child collections. Only collections
/// present in the payload are touched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub links: Option<Vec<ReorderPair>>,
    pub metrics: Option<Vec<ReorderPair>>,
    pub gallery: Option<Vec<ReorderPair>>,
    pub detail_sections: Option<Vec<ReorderPair>>,
    pub code_snippets: Option<Vec<ReorderPair>>,
}

/// Filters for the paginated list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// 1-based page number; values below 1 are clamped to 1.
    pub page: i64,
    /// Page size; clamped to `[1, 50]`.
    pub page_size: i64,
    /// Case-insensitive substring match over title/summary/description.
    pub query: Option<String>,
    /// Exact tag membership filter.
    pub tag: Option<String>,
}
