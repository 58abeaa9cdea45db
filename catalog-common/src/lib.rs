//! # Composer Catalog Common Library
//!
//! Shared code for the composer catalog service:
//! - Error type
//! - Configuration and root folder resolution
//! - Database initialization and the `Composer` model
//! - Field constraints shared by the HTTP validator and the record store

pub mod config;
pub mod db;
pub mod error;
pub mod schema;

pub use db::models::Composer;
pub use error::{Error, Result};
pub use schema::{ComposerDraft, FieldIssue};
