//! Pandoc-backed document converter
//!
//! Runs `pandoc` once per note, feeding the transformed Markdown on stdin and
//! reading the finished HTML document from stdout.

use obs2html_core::platform::{CURRENT_PLATFORM, Platform};
use obs2html_core::{DocumentConverter, Error as CoreError, RenderJob, Result as CoreResult};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DOWNLOAD_URL: &str = "https://pandoc.org/installing.html";

/// Conversion switches taken from the `[convert]` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PandocOptions {
    /// Inline images and other resources into the HTML (`--embed-resources`)
    pub embed_resources: bool,
    /// Treat Pandoc warnings as errors (`--fail-if-warnings`)
    pub fail_if_warnings: bool,
    /// Keep single newlines as line breaks, like Obsidian does
    pub hard_line_breaks: bool,
}

impl Default for PandocOptions {
    fn default() -> Self {
        Self {
            embed_resources: true,
            fail_if_warnings: true,
            hard_line_breaks: true,
        }
    }
}

/// Converter that shells out to a located `pandoc` binary
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
    options: PandocOptions,
}

impl PandocConverter {
    /// Find `program` on `PATH` (or accept it as a path)
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConverterUnavailable`] with platform-specific
    /// installation instructions when the binary cannot be found.
    pub fn locate(program: &str, options: PandocOptions) -> CoreResult<Self> {
        let path = which::which(program).map_err(|e| {
            debug!("Failed to locate {program}: {e}");
            CoreError::ConverterUnavailable {
                program: program.to_string(),
                hint: installation_hint(),
            }
        })?;

        debug!("Using pandoc at {}", path.display());
        Ok(Self {
            program: path,
            options,
        })
    }

    /// Resolved path of the binary
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First line of `pandoc --version`
    pub fn version(&self) -> CoreResult<String> {
        let output = duct::cmd(&self.program, ["--version"])
            .stderr_null()
            .read()
            .map_err(|e| self.spawn_error(&e))?;
        Ok(output.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Command-line arguments for one render job
    pub fn args(&self, job: &RenderJob<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--standalone".into()];

        if self.options.embed_resources {
            args.push("--embed-resources".into());
        }

        let from = if self.options.hard_line_breaks {
            "markdown+hard_line_breaks"
        } else {
            "markdown"
        };
        args.extend(["-f".into(), from.into(), "-t".into(), "html".into()]);

        if !job.resource_dirs.is_empty() {
            args.push("--resource-path".into());
            args.push(resource_path(job.resource_dirs));
        }

        args.push("--template".into());
        args.push(job.template.as_os_str().to_owned());

        for (key, value) in job.metadata {
            args.push("--metadata".into());
            args.push(format!("{key}={value}").into());
        }

        if self.options.fail_if_warnings {
            args.push("--fail-if-warnings".into());
        }

        args
    }

    fn spawn_error(&self, e: &io::Error) -> CoreError {
        if e.kind() == io::ErrorKind::NotFound {
            CoreError::ConverterUnavailable {
                program: self.program.display().to_string(),
                hint: installation_hint(),
            }
        } else {
            CoreError::Message(format!("Failed to run {}: {e}", self.program.display()))
        }
    }
}

impl DocumentConverter for PandocConverter {
    fn render(&self, job: &RenderJob<'_>) -> CoreResult<String> {
        let output = duct::cmd(&self.program, self.args(job))
            .stdin_bytes(job.markdown.as_bytes().to_vec())
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|e| self.spawn_error(&e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(CoreError::Converter {
                status: output.status.to_string(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            warn!("pandoc: {stderr}");
        }

        String::from_utf8(output.stdout)
            .map_err(|e| CoreError::Message(format!("pandoc produced invalid UTF-8: {e}")))
    }
}

/// Join resource directories with the platform's path-list separator
fn resource_path(dirs: &[PathBuf]) -> OsString {
    std::env::join_paths(dirs).unwrap_or_else(|e| {
        warn!("Cannot combine resource directories: {e}");
        dirs.first()
            .map(|dir| dir.as_os_str().to_owned())
            .unwrap_or_default()
    })
}

/// Installation instructions for the current machine
pub fn installation_hint() -> String {
    let has_brew = CURRENT_PLATFORM.is_darwin() && which::which("brew").is_ok();
    installation_hint_for(&CURRENT_PLATFORM, has_brew)
}

/// Installation instructions for a given platform
pub fn installation_hint_for(platform: &Platform, has_brew: bool) -> String {
    match platform.os {
        "darwin" if has_brew => "install it with `brew install pandoc`".to_string(),
        "darwin" => format!(
            "install Homebrew from https://brew.sh and run `brew install pandoc`, or download it from {DOWNLOAD_URL}"
        ),
        "windows" => format!(
            "install it with `winget install pandoc` or `choco install pandoc`, or download the installer from {DOWNLOAD_URL}"
        ),
        "linux" => format!(
            "install it with your package manager (`sudo apt-get install pandoc`, `sudo dnf install pandoc`, `sudo pacman -S pandoc`) or download it from {DOWNLOAD_URL}"
        ),
        _ => format!("download it from {DOWNLOAD_URL}"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use obs2html_core::Metadata;
    use tempfile::TempDir;

    fn converter(options: PandocOptions) -> PandocConverter {
        PandocConverter {
            program: PathBuf::from("pandoc"),
            options,
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_default_args() {
        let mut metadata = Metadata::new();
        metadata.insert("author".to_string(), "Ann".to_string());
        metadata.insert("title".to_string(), "a".to_string());
        let dirs = vec![PathBuf::from("/vault")];
        let job = RenderJob {
            markdown: "# Hi",
            template: Path::new("/data/user.html"),
            metadata: &metadata,
            resource_dirs: &dirs,
        };

        let args = strings(&converter(PandocOptions::default()).args(&job));
        assert_eq!(
            args,
            vec![
                "--standalone",
                "--embed-resources",
                "-f",
                "markdown+hard_line_breaks",
                "-t",
                "html",
                "--resource-path",
                "/vault",
                "--template",
                "/data/user.html",
                "--metadata",
                "author=Ann",
                "--metadata",
                "title=a",
                "--fail-if-warnings",
            ]
        );
    }

    #[test]
    fn test_args_with_switches_off() {
        let metadata = Metadata::new();
        let job = RenderJob {
            markdown: "",
            template: Path::new("t.html"),
            metadata: &metadata,
            resource_dirs: &[],
        };
        let options = PandocOptions {
            embed_resources: false,
            fail_if_warnings: false,
            hard_line_breaks: false,
        };

        let args = strings(&converter(options).args(&job));
        assert_eq!(
            args,
            vec!["--standalone", "-f", "markdown", "-t", "html", "--template", "t.html"]
        );
    }

    #[test]
    fn test_resource_path_joins_directories() {
        let joined = resource_path(&[PathBuf::from("/vault"), PathBuf::from("/vault/notes")]);
        let parts: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(parts, vec![PathBuf::from("/vault"), PathBuf::from("/vault/notes")]);
    }

    #[test]
    fn test_locate_missing_program() {
        let err = PandocConverter::locate("obs2html-no-such-converter", PandocOptions::default())
            .unwrap_err();
        match err {
            CoreError::ConverterUnavailable { program, hint } => {
                assert_eq!(program, "obs2html-no-such-converter");
                assert!(hint.contains(DOWNLOAD_URL) || hint.contains("brew install pandoc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_installation_hints() {
        let mac = Platform { os: "darwin", arch: "aarch64" };
        assert!(installation_hint_for(&mac, true).contains("brew install pandoc"));
        assert!(installation_hint_for(&mac, false).contains("https://brew.sh"));

        let windows = Platform { os: "windows", arch: "x86_64" };
        assert!(installation_hint_for(&windows, false).contains("winget"));

        let linux = Platform { os: "linux", arch: "x86_64" };
        assert!(installation_hint_for(&linux, false).contains("apt-get"));

        let other = Platform { os: "freebsd", arch: "x86_64" };
        assert!(installation_hint_for(&other, false).contains(DOWNLOAD_URL));
    }

    #[test]
    fn test_render_with_installed_pandoc() {
        let options = PandocOptions {
            embed_resources: false,
            fail_if_warnings: false,
            hard_line_breaks: true,
        };
        let Ok(converter) = PandocConverter::locate("pandoc", options) else {
            // Not installed on this machine
            return;
        };

        let temp = TempDir::new().unwrap();
        let template = temp.path().join("t.html");
        std::fs::write(&template, "<title>$title$</title>\n$body$\n").unwrap();

        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), "Note".to_string());
        let job = RenderJob {
            markdown: "Hello *world*",
            template: &template,
            metadata: &metadata,
            resource_dirs: &[],
        };

        let html = converter.render(&job).unwrap();
        assert!(html.contains("<title>Note</title>"));
        assert!(html.contains("<em>world</em>"));
        assert!(!converter.version().unwrap().is_empty());
    }
}
