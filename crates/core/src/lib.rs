//! Domain types shared across the folio backend.
//!
//! Keeps the error taxonomy, id/timestamp aliases, role and status
//! constants, and validation helpers free of HTTP and database
//! dependencies so both the repository layer and the API crate can
//! depend on them.

pub mod error;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
