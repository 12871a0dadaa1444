//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step writes run
//! inside a single transaction.

pub mod project_repo;
pub mod revision_repo;

pub use project_repo::ProjectRepo;
pub use revision_repo::RevisionRepo;
