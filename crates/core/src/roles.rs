//! Well-known role name constants.
//!
//! Roles are an unordered set with no implied hierarchy; each endpoint
//! enumerates the roles it accepts.

pub const ROLE_VIEWER: &str = "viewer";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_ADMIN: &str = "admin";
