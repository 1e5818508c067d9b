//! # obs2html engine
//!
//! Converts an Obsidian vault into a tree of standalone HTML pages.
//!
//! - **Walker**: lists notes and assets, pruning excluded folders
//! - **Frontmatter**: splits YAML properties from the note body
//! - **Transform**: rewrites wiki links, embeds, highlights and YouTube links
//! - **Template / Metadata**: decides which properties reach the template
//! - **Pandoc**: the production [`DocumentConverter`](obs2html_core::DocumentConverter)
//! - **Timestamps**: creation-time preservation per platform
//! - **Processor**: drives the per-file pipeline and collects a report

pub mod error;
pub mod frontmatter;
pub mod links;
pub mod metadata;
pub mod pandoc;
pub mod processor;
pub mod template;
pub mod timestamps;
pub mod transform;
pub mod walker;

// Re-export path types from core
pub use obs2html_core::path::{AbsPath, RelPath};

pub use error::{Error, Result};

// Re-export commonly used types
pub use pandoc::{PandocConverter, PandocOptions};
pub use processor::{FileFailure, Outcome, RunReport, VaultProcessor};
pub use template::Template;
pub use transform::Transformer;
pub use walker::{WorkItem, WorkItemKind, plan};
