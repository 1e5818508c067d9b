//! Core types and utilities for obs2html
//!
//! This is the foundation crate that all other obs2html crates depend on.
//! It provides:
//! - Path types (AbsPath, RelPath) and small filesystem helpers
//! - Base error types
//! - Platform detection
//! - Collaborator traits (DocumentConverter, CreationTimeSync)
//!
//! This crate has no dependencies on other obs2html crates.

pub mod error;
pub mod path;
pub mod platform;
pub mod traits;

pub use error::{Error, Result};
pub use traits::{CreationTimeSync, DocumentConverter, Metadata, RenderJob};
