//! Per-file conversion pipeline
//!
//! For every planned file the processor either converts it (notes) or copies
//! it (everything else) into the mirrored output tree:
//!
//! 1. Read the note and split off its frontmatter
//! 2. Skip it if an exclusion property is set
//! 3. Rewrite Obsidian syntax
//! 4. Render it through the converter with template-declared metadata
//! 5. Write the HTML and carry over the creation time
//!
//! A failing file never stops the run; failures are collected in a
//! [`RunReport`] instead. The one exception is a converter that disappears
//! mid-run, since every remaining note would fail the same way.

use crate::error::{Error, Result};
use crate::frontmatter;
use crate::links::LinkIndex;
use crate::metadata::build_metadata;
use crate::template::Template;
use crate::transform::Transformer;
use crate::walker::{WorkItem, WorkItemKind};
use obs2html_core::path::{AbsPath, RelPath};
use obs2html_core::{CreationTimeSync, DocumentConverter, RenderJob};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Note rendered to HTML
    Converted {
        /// Written HTML file
        dest: PathBuf,
    },
    /// Asset copied unchanged
    Copied {
        /// Written copy
        dest: PathBuf,
    },
    /// Note left out because of a frontmatter property
    Skipped {
        /// Property that excluded the note
        property: String,
    },
}

/// A file that could not be processed
#[derive(Debug)]
pub struct FileFailure {
    /// Vault-relative path of the file
    pub path: RelPath,
    /// What went wrong
    pub error: Error,
}

/// Summary of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Notes rendered
    pub converted: usize,
    /// Assets copied
    pub copied: usize,
    /// Notes skipped by frontmatter, with the property responsible
    pub skipped: Vec<(RelPath, String)>,
    /// Files that failed
    pub failures: Vec<FileFailure>,
    /// Whether the run stopped early because the converter vanished
    pub aborted: bool,
}

impl RunReport {
    /// Whether any file failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of files handled, including skips and failures
    pub fn total(&self) -> usize {
        self.converted + self.copied + self.skipped.len() + self.failures.len()
    }

    /// Plain-text failure listing, one block per file
    pub fn error_report(&self) -> String {
        let mut out = String::new();
        for failure in &self.failures {
            let _ = writeln!(out, "{}", failure.path);
            let _ = writeln!(out, "  {}", failure.error);
            let mut source = std::error::Error::source(&failure.error);
            while let Some(cause) = source {
                let _ = writeln!(out, "  caused by: {cause}");
                source = cause.source();
            }
            out.push('\n');
        }
        out
    }

    /// Write [`RunReport::error_report`] to `path`, or remove `path` if nothing failed
    pub fn save_error_report(&self, path: &Path) -> Result<()> {
        if !self.has_failures() {
            return match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(Error::FileWrite {
                    path: path.to_path_buf(),
                    source: e,
                }),
            };
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, self.error_report()).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Converts a planned vault into an output tree
pub struct VaultProcessor<C, T>
where
    C: DocumentConverter,
    T: CreationTimeSync,
{
    vault: AbsPath,
    output: AbsPath,
    template: Template,
    converter: C,
    time_sync: T,
    transformer: Transformer,
    exclude_properties: Vec<String>,
}

impl<C, T> VaultProcessor<C, T>
where
    C: DocumentConverter,
    T: CreationTimeSync,
{
    /// Create a processor
    ///
    /// `resource_dir` is the vault-relative folder bare attachment names fall
    /// back to.
    pub fn new(
        vault: AbsPath,
        output: AbsPath,
        template: Template,
        converter: C,
        time_sync: T,
        resource_dir: &str,
    ) -> Self {
        Self {
            vault,
            output,
            template,
            converter,
            time_sync,
            transformer: Transformer::new(resource_dir),
            exclude_properties: Vec::new(),
        }
    }

    /// Skip notes whose frontmatter sets any of these properties to a truthy value
    #[must_use]
    pub fn with_exclude_properties(mut self, properties: Vec<String>) -> Self {
        self.exclude_properties = properties;
        self
    }

    /// Resolve links against the files of a plan
    pub fn index(&mut self, items: &[WorkItem]) {
        let transformer = std::mem::take(&mut self.transformer);
        self.transformer = transformer.with_index(LinkIndex::from_items(items));
    }

    /// Process every item, reporting each result to `observer` as it completes
    pub fn run<F>(&mut self, items: &[WorkItem], mut observer: F) -> RunReport
    where
        F: FnMut(&WorkItem, &Result<Outcome>),
    {
        self.index(items);
        info!(
            "Converting {} into {} using {}",
            self.vault,
            self.output,
            self.time_sync.name()
        );

        let mut report = RunReport::default();
        for item in items {
            let result = self.process(item);
            observer(item, &result);

            match result {
                Ok(Outcome::Converted { .. }) => report.converted += 1,
                Ok(Outcome::Copied { .. }) => report.copied += 1,
                Ok(Outcome::Skipped { property }) => report.skipped.push((item.rel.clone(), property)),
                Err(error) => {
                    let fatal = error.is_converter_unavailable();
                    warn!("{}: {error}", item.rel);
                    report.failures.push(FileFailure {
                        path: item.rel.clone(),
                        error,
                    });
                    if fatal {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        report
    }

    /// Process a single file
    pub fn process(&self, item: &WorkItem) -> Result<Outcome> {
        match item.kind {
            WorkItemKind::Note => self.convert_note(item),
            WorkItemKind::Asset => self.copy_asset(item),
        }
    }

    fn convert_note(&self, item: &WorkItem) -> Result<Outcome> {
        let source = item.source.as_path();
        let bytes = fs::read(source).map_err(|e| Error::FileRead {
            path: source.to_path_buf(),
            source: e,
        })?;
        let content = String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8 {
            path: source.to_path_buf(),
            source: e,
        })?;

        let parsed = frontmatter::parse(&content);
        if let Some(message) = &parsed.yaml_error {
            warn!("{}: ignoring invalid frontmatter: {message}", item.rel);
        }

        if let Some(property) = parsed.frontmatter.excluded_by(&self.exclude_properties) {
            debug!("{}: excluded by '{property}'", item.rel);
            return Ok(Outcome::Skipped {
                property: property.to_string(),
            });
        }

        let markdown = self.transformer.apply(parsed.body, item.rel.as_path());
        let stem = item.rel.file_stem().unwrap_or_default();
        let metadata = build_metadata(&parsed.frontmatter, &self.template, stem);

        let mut resource_dirs = vec![self.vault.as_path().to_path_buf()];
        if let Some(dir) = source.parent()
            && dir != self.vault.as_path()
        {
            resource_dirs.push(dir.to_path_buf());
        }

        let job = RenderJob {
            markdown: &markdown,
            template: self.template.path(),
            metadata: &metadata,
            resource_dirs: &resource_dirs,
        };
        let html = self.converter.render(&job).map_err(|e| Error::Convert {
            path: item.rel.clone(),
            source: e,
        })?;

        let dest = self.output.join(&item.rel.with_extension("html"));
        ensure_parent(dest.as_path())?;
        fs::write(dest.as_path(), html).map_err(|e| Error::FileWrite {
            path: dest.as_path().to_path_buf(),
            source: e,
        })?;

        self.preserve_time(item, dest.as_path());
        debug!("Converted {} -> {}", item.rel, dest);
        Ok(Outcome::Converted {
            dest: dest.into_path_buf(),
        })
    }

    fn copy_asset(&self, item: &WorkItem) -> Result<Outcome> {
        let dest = self.output.join(&item.rel);
        ensure_parent(dest.as_path())?;
        fs::copy(item.source.as_path(), dest.as_path()).map_err(|e| Error::FileCopy {
            from: item.source.as_path().to_path_buf(),
            to: dest.as_path().to_path_buf(),
            source: e,
        })?;

        self.preserve_time(item, dest.as_path());
        debug!("Copied {} -> {}", item.rel, dest);
        Ok(Outcome::Copied {
            dest: dest.into_path_buf(),
        })
    }

    fn preserve_time(&self, item: &WorkItem, dest: &Path) {
        if let Err(e) = self.time_sync.sync(item.source.as_path(), dest) {
            warn!("{}: could not preserve creation time: {e}", item.rel);
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::timestamps::NoopTimeSync;
    use crate::walker::plan;
    use obs2html_core::{Error as CoreError, Result as CoreResult};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every job and echoes the markdown inside a minimal document
    #[derive(Default)]
    struct RecordingConverter {
        jobs: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl DocumentConverter for RecordingConverter {
        fn render(&self, job: &RenderJob<'_>) -> CoreResult<String> {
            let metadata = job
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            self.jobs.borrow_mut().push((job.markdown.to_string(), metadata));
            Ok(format!("<html>{}</html>", job.markdown))
        }
    }

    struct FailingConverter(fn() -> CoreError);

    impl DocumentConverter for FailingConverter {
        fn render(&self, _job: &RenderJob<'_>) -> CoreResult<String> {
            Err((self.0)())
        }
    }

    struct Fixture {
        _temp: TempDir,
        vault: AbsPath,
        output: AbsPath,
        template: Template,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let vault = temp.path().join("vault");
        let output = temp.path().join("site");
        for (rel, content) in files {
            let path = vault.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        fs::create_dir_all(&vault).unwrap();
        Fixture {
            vault: AbsPath::new(vault).unwrap(),
            output: AbsPath::new(output).unwrap(),
            template: Template::from_source(temp.path().join("t.html"), "$title$ $author$ $body$"),
            _temp: temp,
        }
    }

    #[test]
    fn test_convert_note_and_copy_asset() {
        let fx = fixture(&[("notes/a.md", "See [[b]]"), ("notes/b.md", "B"), ("pic.png", "PNG")]);
        let items = plan(&fx.vault, &[]).unwrap();
        let converter = RecordingConverter::default();
        let mut processor = VaultProcessor::new(
            fx.vault.clone(),
            fx.output.clone(),
            fx.template.clone(),
            &converter,
            NoopTimeSync,
            "_resources",
        );

        let mut seen = 0;
        let report = processor.run(&items, |_, _| seen += 1);

        assert_eq!(seen, 3);
        assert_eq!(report.converted, 2);
        assert_eq!(report.copied, 1);
        assert!(!report.has_failures());
        assert_eq!(report.total(), 3);

        let a = fs::read_to_string(fx.output.as_path().join("notes/a.html")).unwrap();
        assert_eq!(a, "<html>See [b](b.html)</html>");
        assert_eq!(fs::read(fx.output.as_path().join("pic.png")).unwrap(), b"PNG");
    }

    #[test]
    fn test_frontmatter_exclusion() {
        let fx = fixture(&[("a.md", "---\ndraft: yes\n---\nhidden"), ("b.md", "shown")]);
        let items = plan(&fx.vault, &[]).unwrap();
        let converter = RecordingConverter::default();
        let mut processor = VaultProcessor::new(
            fx.vault.clone(),
            fx.output.clone(),
            fx.template.clone(),
            &converter,
            NoopTimeSync,
            "",
        )
        .with_exclude_properties(vec!["draft".to_string()]);

        let report = processor.run(&items, |_, _| {});

        assert_eq!(report.converted, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].1, "draft");
        assert!(!fx.output.as_path().join("a.html").exists());
    }

    #[test]
    fn test_metadata_and_stripped_frontmatter() {
        let fx = fixture(&[("a.md", "---\nauthor: Ann\nsecret: x\n---\nBody")]);
        let items = plan(&fx.vault, &[]).unwrap();
        let converter = RecordingConverter::default();
        let mut processor = VaultProcessor::new(
            fx.vault.clone(),
            fx.output.clone(),
            fx.template.clone(),
            &converter,
            NoopTimeSync,
            "",
        );
        processor.run(&items, |_, _| {});

        let jobs = converter.jobs.borrow();
        assert_eq!(jobs.len(), 1);
        let (markdown, metadata) = &jobs[0];
        assert_eq!(markdown, "Body");
        assert_eq!(
            metadata,
            &vec![
                ("author".to_string(), "Ann".to_string()),
                ("title".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn test_failure_is_recorded_and_run_continues() {
        let fx = fixture(&[("a.md", "a"), ("b.md", "b"), ("c.txt", "c")]);
        let items = plan(&fx.vault, &[]).unwrap();
        let converter = FailingConverter(|| CoreError::Converter {
            status: "exit status: 64".to_string(),
            stderr: "bad input".to_string(),
        });
        let mut processor = VaultProcessor::new(
            fx.vault.clone(),
            fx.output.clone(),
            fx.template.clone(),
            converter,
            NoopTimeSync,
            "",
        );

        let report = processor.run(&items, |_, _| {});

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.copied, 1);
        assert!(!report.aborted);
        let text = report.error_report();
        assert!(text.contains("a.md"));
        assert!(text.contains("bad input"));
    }

    #[test]
    fn test_missing_converter_aborts() {
        let fx = fixture(&[("a.md", "a"), ("b.md", "b")]);
        let items = plan(&fx.vault, &[]).unwrap();
        let converter = FailingConverter(|| CoreError::ConverterUnavailable {
            program: "pandoc".to_string(),
            hint: "install it".to_string(),
        });
        let mut processor = VaultProcessor::new(
            fx.vault.clone(),
            fx.output.clone(),
            fx.template.clone(),
            converter,
            NoopTimeSync,
            "",
        );

        let report = processor.run(&items, |_, _| {});

        assert!(report.aborted);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_note_fails() {
        let fx = fixture(&[]);
        fs::write(fx.vault.as_path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();
        let items = plan(&fx.vault, &[]).unwrap();
        let converter = RecordingConverter::default();
        let processor = VaultProcessor::new(
            fx.vault.clone(),
            fx.output.clone(),
            fx.template.clone(),
            &converter,
            NoopTimeSync,
            "",
        );

        let err = processor.process(&items[0]).unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8 { .. }));
    }

    #[test]
    fn test_save_error_report_writes_and_clears() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state").join("errors.txt");

        let mut report = RunReport::default();
        report.failures.push(FileFailure {
            path: RelPath::new("a.md".into()).unwrap(),
            error: Error::Io(std::io::Error::other("boom")),
        });
        report.save_error_report(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("boom"));

        RunReport::default().save_error_report(&path).unwrap();
        assert!(!path.exists());
    }
}
