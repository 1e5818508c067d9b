//! Creation-time preservation
//!
//! macOS exposes creation time through the `SetFile` developer tool, Windows
//! through the file-times API. Elsewhere the best available approximation is
//! to stamp the output's modification time with the source's creation time.

use chrono::{DateTime, Local};
use obs2html_core::platform::CURRENT_PLATFORM;
use obs2html_core::{CreationTimeSync, Error as CoreError, Result as CoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Date format understood by `SetFile -d`
const SETFILE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Source creation time, falling back to modification time
pub fn source_time(source: &Path) -> CoreResult<SystemTime> {
    let metadata = fs::metadata(source)?;
    Ok(metadata.created().or_else(|_| metadata.modified())?)
}

/// macOS: set the creation date with `SetFile -d`
#[derive(Debug, Clone)]
pub struct SetFileSync {
    program: PathBuf,
}

impl SetFileSync {
    /// Use the `SetFile` binary at `program`
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Format a timestamp the way `SetFile` expects it, in local time
    pub fn format_time(time: SystemTime) -> String {
        DateTime::<Local>::from(time).format(SETFILE_FORMAT).to_string()
    }
}

impl CreationTimeSync for SetFileSync {
    fn name(&self) -> &'static str {
        "SetFile"
    }

    fn sync(&self, source: &Path, dest: &Path) -> CoreResult<()> {
        let stamp = Self::format_time(source_time(source)?);
        let output = duct::cmd(
            &self.program,
            [
                "-d".into(),
                stamp.into(),
                dest.as_os_str().to_owned(),
            ],
        )
        .stdout_null()
        .stderr_capture()
        .unchecked()
        .run()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CoreError::Message(format!(
                "SetFile failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Set file times through the standard library
///
/// Sets the creation time where the OS supports it (Windows) and always sets
/// modification and access times to the source's creation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTimesSync;

impl CreationTimeSync for FileTimesSync {
    fn name(&self) -> &'static str {
        "file-times"
    }

    fn sync(&self, source: &Path, dest: &Path) -> CoreResult<()> {
        let time = source_time(source)?;
        let times = fs::FileTimes::new().set_modified(time).set_accessed(time);

        #[cfg(windows)]
        let times = {
            use std::os::windows::fs::FileTimesExt;
            times.set_created(time)
        };

        let file = fs::OpenOptions::new().write(true).open(dest)?;
        file.set_times(times)?;
        Ok(())
    }
}

/// Leave timestamps alone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTimeSync;

impl CreationTimeSync for NoopTimeSync {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn sync(&self, _source: &Path, _dest: &Path) -> CoreResult<()> {
        Ok(())
    }
}

/// Pick the best creation-time strategy for this machine
pub fn platform_time_sync() -> Box<dyn CreationTimeSync> {
    if CURRENT_PLATFORM.is_darwin() {
        match which::which("SetFile") {
            Ok(program) => {
                debug!("Preserving creation times with {}", program.display());
                return Box::new(SetFileSync::new(program));
            }
            Err(_) => debug!("SetFile not found (install the Xcode command line tools); using file times"),
        }
    }
    Box::new(FileTimesSync)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_setfile_format() {
        let time: SystemTime = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap().into();
        assert_eq!(SetFileSync::format_time(time), "03/09/2024 07:05:01");
    }

    #[test]
    fn test_file_times_sync_copies_source_time() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.md");
        let dest = temp.path().join("a.html");
        fs::write(&source, "# a").unwrap();
        fs::write(&dest, "<p>a</p>").unwrap();

        let old = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000);
        let file = fs::OpenOptions::new().write(true).open(&source).unwrap();
        file.set_times(fs::FileTimes::new().set_modified(old)).unwrap();
        drop(file);

        FileTimesSync.sync(&source, &dest).unwrap();

        let expected = source_time(&source).unwrap();
        assert_eq!(fs::metadata(&dest).unwrap().modified().unwrap(), expected);
    }

    #[test]
    fn test_file_times_sync_missing_source() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("a.html");
        fs::write(&dest, "").unwrap();
        assert!(FileTimesSync.sync(&temp.path().join("missing.md"), &dest).is_err());
    }

    #[test]
    fn test_noop_sync() {
        assert_eq!(NoopTimeSync.name(), "noop");
        assert!(NoopTimeSync.sync(Path::new("/nope"), Path::new("/nope")).is_ok());
    }

    #[test]
    fn test_platform_time_sync_name() {
        let sync = platform_time_sync();
        assert!(["SetFile", "file-times"].contains(&sync.name()));
    }
}
