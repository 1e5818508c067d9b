//! Collaborator traits for the conversion pipeline
//!
//! The engine talks to the outside world through two narrow interfaces:
//!
//! - [`DocumentConverter`]: turns transformed Markdown into an HTML document
//!   (Pandoc in production, an in-memory fake in tests)
//! - [`CreationTimeSync`]: copies a source file's creation time onto its
//!   output, where the operating system allows it
//!
//! Keeping these behind traits lets the walker and transformer be exercised
//! without spawning processes or depending on filesystem timestamp support.

use crate::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Ordered metadata passed to the converter (key → rendered value)
pub type Metadata = IndexMap<String, String>;

/// Everything a converter needs to render one note
#[derive(Debug, Clone)]
pub struct RenderJob<'a> {
    /// Transformed Markdown body (frontmatter already removed)
    pub markdown: &'a str,
    /// HTML template the converter fills in
    pub template: &'a Path,
    /// Metadata restricted to the keys the template declares
    pub metadata: &'a Metadata,
    /// Directories searched for images and other embedded resources
    pub resource_dirs: &'a [PathBuf],
}

/// Markdown → HTML converter interface
///
/// # Examples
///
/// ```
/// use obs2html_core::{DocumentConverter, Metadata, RenderJob, Result};
/// use std::path::Path;
///
/// struct Echo;
///
/// impl DocumentConverter for Echo {
///     fn render(&self, job: &RenderJob<'_>) -> Result<String> {
///         Ok(format!("<body>{}</body>", job.markdown))
///     }
/// }
///
/// let metadata = Metadata::new();
/// let job = RenderJob {
///     markdown: "hello",
///     template: Path::new("user.html"),
///     metadata: &metadata,
///     resource_dirs: &[],
/// };
/// assert_eq!(Echo.render(&job).unwrap(), "<body>hello</body>");
/// ```
pub trait DocumentConverter {
    /// Render a complete HTML document
    ///
    /// # Errors
    ///
    /// Returns an error if the converter is unavailable or reports a failure.
    fn render(&self, job: &RenderJob<'_>) -> Result<String>;
}

/// Creation-time preservation capability
///
/// Not every platform can set a file's creation time. Implementations either
/// do it, approximate it, or do nothing, but they never decide whether a file
/// conversion succeeded.
pub trait CreationTimeSync {
    /// Short name for logging (e.g. "SetFile", "noop")
    fn name(&self) -> &'static str;

    /// Copy the creation time of `source` onto `dest`
    ///
    /// # Errors
    ///
    /// Returns an error if timestamps cannot be read or written.
    fn sync(&self, source: &Path, dest: &Path) -> Result<()>;
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for &T {
    fn render(&self, job: &RenderJob<'_>) -> Result<String> {
        (**self).render(job)
    }
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for Box<T> {
    fn render(&self, job: &RenderJob<'_>) -> Result<String> {
        (**self).render(job)
    }
}

impl<T: CreationTimeSync + ?Sized> CreationTimeSync for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn sync(&self, source: &Path, dest: &Path) -> Result<()> {
        (**self).sync(source, dest)
    }
}
