//! Row models and request DTOs.
//!
//! Row structs derive `FromRow` and serialize with the camelCase field
//! names the public API contract uses. DTOs derive `validator::Validate`;
//! validation runs fully before any store mutation begins.

pub mod project;
pub mod revision;
