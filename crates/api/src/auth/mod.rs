//! Authentication building blocks.
//!
//! - [`jwt`]: token issuance and verification (HS256).

pub mod jwt;
