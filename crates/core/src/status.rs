//! Project publication status constants.
//!
//! Status toggles between `draft` and `published` only via an explicit
//! update; there is no automated publish workflow.

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

/// All accepted status values, in no particular order.
pub const ALL_STATUSES: [&str; 2] = [STATUS_DRAFT, STATUS_PUBLISHED];
