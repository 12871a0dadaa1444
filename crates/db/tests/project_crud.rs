//! Integration tests for the project aggregate repository.
//!
//! Exercises the transaction logic against a real database: child-order
//! defaults, replace-all update semantics, the append-only revision
//! trail, reorder scoping, and cascade delete.

use assert_matches::assert_matches;
use sqlx::PgPool;

use folio_db::models::project::{
    CreateProject, DetailSectionInput, LinkInput, MetricInput, ProjectFilter, ReorderPair,
    ReorderRequest, UpdateProject,
};
use folio_db::repositories::{ProjectRepo, RevisionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minimal(slug: &str) -> CreateProject {
    serde_json::from_value(serde_json::json!({
        "title": "Demo Project",
        "slug": slug,
    }))
    .expect("payload should deserialize")
}

fn with_children(slug: &str) -> CreateProject {
    serde_json::from_value(serde_json::json!({
        "title": "Demo Project",
        "slug": slug,
        "links": [
            {"label": "Repo", "url": "https://example.com/repo"},
            {"label": "Live", "url": "https://example.com/live"}
        ],
        "metrics": [{"label": "Latency", "value": "12ms"}],
        "detailSections": [
            {
                "heading": "Overview",
                "body": ["one"],
                "codeSnippets": [
                    {"title": "Handler", "language": "rust", "code": "fn main() {}"}
                ]
            }
        ]
    }))
    .expect("payload should deserialize")
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count query should succeed")
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_appends_initial_revision(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &minimal("demo-project"), Some("op-1"))
        .await
        .expect("create should succeed");
    assert_eq!(project.version, 1);
    assert_eq!(project.status, "draft");

    let revisions = RevisionRepo::list_for_project(&pool, project.id)
        .await
        .expect("revision listing should succeed");
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].version, 1);
    assert_eq!(revisions[0].summary, "Initial create");
    assert_eq!(revisions[0].actor_id.as_deref(), Some("op-1"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_defaults_child_order_to_position(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");

    let links = ProjectRepo::links_for_project(&pool, project.id)
        .await
        .expect("link listing should succeed");
    assert_eq!(links.len(), 2);
    assert_eq!((links[0].sort_order, links[1].sort_order), (0, 1));
    assert_eq!(links[0].label, "Repo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_duplicate_slug_hits_unique_constraint(pool: PgPool) {
    ProjectRepo::create(&pool, &minimal("demo-project"), None)
        .await
        .expect("create should succeed");

    // The uq_projects_slug constraint backstops the handler's pre-check
    // against a concurrent create.
    let err = ProjectRepo::create(&pool, &minimal("demo-project"), None)
        .await
        .expect_err("duplicate slug must be rejected");
    assert_matches!(&err, sqlx::Error::Database(db_err) => {
        assert_eq!(db_err.code().as_deref(), Some("23505"));
        assert_eq!(db_err.constraint(), Some("uq_projects_slug"));
    });

    // The failed transaction left no partial rows behind.
    assert_eq!(count(&pool, "projects").await, 1);
    assert_eq!(count(&pool, "project_revisions").await, 1);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_bumps_version_and_appends_revision(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &minimal("demo-project"), None)
        .await
        .expect("create should succeed");

    let input = UpdateProject {
        summary: Some("Updated summary".to_string()),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, project.id, &input, Some("op-2"))
        .await
        .expect("update should succeed")
        .expect("project exists");
    assert_eq!(updated.version, 2);
    assert_eq!(updated.summary.as_deref(), Some("Updated summary"));
    assert_eq!(updated.title, "Demo Project");
    assert!(updated.updated_at >= project.updated_at);

    let revisions = RevisionRepo::list_for_project(&pool, project.id)
        .await
        .expect("revision listing should succeed");
    assert_eq!(revisions.len(), 2);
    assert_eq!(revisions[1].version, 2);
    assert_eq!(revisions[1].summary, "Update");
    assert_eq!(revisions[1].actor_id.as_deref(), Some("op-2"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sequential_updates_record_every_version(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &minimal("demo-project"), None)
        .await
        .expect("create should succeed");

    // Two further writers race with last-write-wins: both revisions are
    // still recorded, versions 2 and 3.
    for _ in 0..2 {
        ProjectRepo::update(&pool, project.id, &UpdateProject::default(), None)
            .await
            .expect("update should succeed")
            .expect("project exists");
    }

    let revisions = RevisionRepo::list_for_project(&pool, project.id)
        .await
        .expect("revision listing should succeed");
    let versions: Vec<i32> = revisions.iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replace_all_is_idempotent(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");

    let links = vec![
        LinkInput {
            label: "Docs".to_string(),
            url: "https://example.com/docs".to_string(),
            order: None,
        },
        LinkInput {
            label: "Blog".to_string(),
            url: "https://example.com/blog".to_string(),
            order: None,
        },
    ];
    let input = UpdateProject {
        links: Some(links),
        ..Default::default()
    };

    // Applying the same collection payload twice yields the same set of
    // child records (same content, new internal ids each time).
    let mut first_ids = Vec::new();
    for pass in 0..2 {
        ProjectRepo::update(&pool, project.id, &input, None)
            .await
            .expect("update should succeed")
            .expect("project exists");

        let stored = ProjectRepo::links_for_project(&pool, project.id)
            .await
            .expect("link listing should succeed");
        let labels: Vec<&str> = stored.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Docs", "Blog"]);

        if pass == 0 {
            first_ids = stored.iter().map(|l| l.id).collect();
        } else {
            assert!(stored.iter().all(|l| !first_ids.contains(&l.id)));
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_absent_collections_are_untouched(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");

    let input = UpdateProject {
        metrics: Some(vec![MetricInput {
            label: "Uptime".to_string(),
            value: "99.9%".to_string(),
            order: None,
        }]),
        ..Default::default()
    };
    ProjectRepo::update(&pool, project.id, &input, None)
        .await
        .expect("update should succeed")
        .expect("project exists");

    // Links and sections were not in the payload: same rows, same ids.
    let links = ProjectRepo::links_for_project(&pool, project.id)
        .await
        .expect("link listing should succeed");
    assert_eq!(links.len(), 2);
    assert_eq!(count(&pool, "detail_sections").await, 1);
    assert_eq!(count(&pool, "code_snippets").await, 1);

    let metrics = ProjectRepo::metrics_for_project(&pool, project.id)
        .await
        .expect("metric listing should succeed");
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].label, "Uptime");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replacing_sections_replaces_their_snippets(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");
    assert_eq!(count(&pool, "code_snippets").await, 1);

    let sections: Vec<DetailSectionInput> = serde_json::from_value(serde_json::json!([
        {"heading": "Rewritten", "body": ["fresh"]}
    ]))
    .expect("sections should deserialize");
    let input = UpdateProject {
        detail_sections: Some(sections),
        ..Default::default()
    };
    ProjectRepo::update(&pool, project.id, &input, None)
        .await
        .expect("update should succeed")
        .expect("project exists");

    assert_eq!(count(&pool, "detail_sections").await, 1);
    assert_eq!(count(&pool, "code_snippets").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_unknown_id_returns_none(pool: PgPool) {
    let result = ProjectRepo::update(
        &pool,
        uuid::Uuid::nil(),
        &UpdateProject::default(),
        None,
    )
    .await
    .expect("update should not error");
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_applies_batch(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");
    let links = ProjectRepo::links_for_project(&pool, project.id)
        .await
        .expect("link listing should succeed");

    let req = ReorderRequest {
        links: Some(vec![
            ReorderPair {
                id: links[0].id,
                order: 5,
            },
            ReorderPair {
                id: links[1].id,
                order: 2,
            },
        ]),
        ..Default::default()
    };
    let applied = ProjectRepo::reorder(&pool, project.id, &req)
        .await
        .expect("reorder should succeed");
    assert!(applied);

    let reordered = ProjectRepo::links_for_project(&pool, project.id)
        .await
        .expect("link listing should succeed");
    assert_eq!(reordered[0].id, links[1].id);
    assert_eq!(reordered[1].id, links[0].id);

    // No version bump, no revision.
    let root = ProjectRepo::find_root_by_id(&pool, project.id)
        .await
        .expect("find should succeed")
        .expect("project exists");
    assert_eq!(root.version, 1);
    let revisions = RevisionRepo::list_for_project(&pool, project.id)
        .await
        .expect("revision listing should succeed");
    assert_eq!(revisions.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_foreign_record_rolls_back_batch(pool: PgPool) {
    let first = ProjectRepo::create(&pool, &with_children("first-project"), None)
        .await
        .expect("create should succeed");
    let second = ProjectRepo::create(&pool, &with_children("second-project"), None)
        .await
        .expect("create should succeed");

    let own = ProjectRepo::links_for_project(&pool, second.id)
        .await
        .expect("link listing should succeed");
    let foreign = ProjectRepo::links_for_project(&pool, first.id)
        .await
        .expect("link listing should succeed");

    // A valid pair followed by a foreign one: the whole batch must roll
    // back, leaving the valid pair unapplied.
    let req = ReorderRequest {
        links: Some(vec![
            ReorderPair {
                id: own[0].id,
                order: 9,
            },
            ReorderPair {
                id: foreign[0].id,
                order: 9,
            },
        ]),
        ..Default::default()
    };
    let applied = ProjectRepo::reorder(&pool, second.id, &req)
        .await
        .expect("reorder should not error");
    assert!(!applied);

    let after = ProjectRepo::links_for_project(&pool, second.id)
        .await
        .expect("link listing should succeed");
    assert_eq!(after[0].sort_order, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_snippets_scoped_via_sections(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");
    let sections = ProjectRepo::sections_for_project(&pool, project.id)
        .await
        .expect("section listing should succeed");
    let snippets = ProjectRepo::snippets_for_section(&pool, sections[0].id)
        .await
        .expect("snippet listing should succeed");

    let req = ReorderRequest {
        code_snippets: Some(vec![ReorderPair {
            id: snippets[0].id,
            order: 3,
        }]),
        ..Default::default()
    };
    let applied = ProjectRepo::reorder(&pool, project.id, &req)
        .await
        .expect("reorder should succeed");
    assert!(applied);

    let snippets = ProjectRepo::snippets_for_section(&pool, sections[0].id)
        .await
        .expect("snippet listing should succeed");
    assert_eq!(snippets[0].sort_order, 3);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_children_and_revisions(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &with_children("demo-project"), None)
        .await
        .expect("create should succeed");

    let deleted = ProjectRepo::delete(&pool, project.id)
        .await
        .expect("delete should succeed");
    assert!(deleted);

    assert_eq!(count(&pool, "projects").await, 0);
    assert_eq!(count(&pool, "project_links").await, 0);
    assert_eq!(count(&pool, "project_metrics").await, 0);
    assert_eq!(count(&pool, "detail_sections").await, 0);
    assert_eq!(count(&pool, "code_snippets").await, 0);
    assert_eq!(count(&pool, "project_revisions").await, 0);

    // Deleting again reports nothing removed.
    let deleted = ProjectRepo::delete(&pool, project.id)
        .await
        .expect("delete should succeed");
    assert!(!deleted);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_query_matches_like_metacharacters_literally(pool: PgPool) {
    for (title, slug) in [
        ("Cache Hit 99%", "cache-hit"),
        ("snake_case importer", "importer"),
        ("Demo Project", "demo-project"),
    ] {
        let input: CreateProject =
            serde_json::from_value(serde_json::json!({"title": title, "slug": slug}))
                .expect("payload should deserialize");
        ProjectRepo::create(&pool, &input, None)
            .await
            .expect("create should succeed");
    }

    // '%' and '_' in the search term are literals, not wildcards.
    let filter = ProjectFilter {
        page: 1,
        page_size: 12,
        query: Some("%".to_string()),
        tag: None,
    };
    let (items, total) = ProjectRepo::list(&pool, &filter)
        .await
        .expect("list should succeed");
    assert_eq!(total, 1);
    assert_eq!(items[0].slug, "cache-hit");

    let filter = ProjectFilter {
        query: Some("_".to_string()),
        ..filter
    };
    let (items, total) = ProjectRepo::list(&pool, &filter)
        .await
        .expect("list should succeed");
    assert_eq!(total, 1);
    assert_eq!(items[0].slug, "importer");

    let filter = ProjectFilter {
        query: Some("99%".to_string()),
        ..filter
    };
    let (_, total) = ProjectRepo::list(&pool, &filter)
        .await
        .expect("list should succeed");
    assert_eq!(total, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_huge_page_returns_empty(pool: PgPool) {
    ProjectRepo::create(&pool, &minimal("demo-project"), None)
        .await
        .expect("create should succeed");

    let filter = ProjectFilter {
        page: i64::MAX,
        page_size: 50,
        query: None,
        tag: None,
    };
    let (items, total) = ProjectRepo::list(&pool, &filter)
        .await
        .expect("list should succeed");
    assert_eq!(total, 1);
    assert!(items.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_clamps_and_counts(pool: PgPool) {
    for i in 1..=3 {
        ProjectRepo::create(&pool, &minimal(&format!("project-{i}")), None)
            .await
            .expect("create should succeed");
    }

    let filter = ProjectFilter {
        page: 0,
        page_size: 500,
        query: None,
        tag: None,
    };
    let (items, total) = ProjectRepo::list(&pool, &filter)
        .await
        .expect("list should succeed");
    assert_eq!(total, 3);
    assert_eq!(items.len(), 3);

    let filter = ProjectFilter {
        page: 2,
        page_size: 2,
        query: None,
        tag: None,
    };
    let (items, total) = ProjectRepo::list(&pool, &filter)
        .await
        .expect("list should succeed");
    assert_eq!(total, 3);
    assert_eq!(items.len(), 1);
}
