//! Project filesystem module
//!
//! Read-only access to the PRP documents and the project directory layout.

pub mod files;
pub mod types;
