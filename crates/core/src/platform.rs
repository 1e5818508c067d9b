//! Platform detection
//!
//! Provides OS and architecture information using standard Unix conventions:
//! - macOS → `"darwin"` (kernel name)
//! - Linux → `"linux"`
//! - Windows → `"windows"`
//!
//! Creation-time preservation and converter installation hints both depend
//! on the OS, so the detected value is cached on first access.

use std::sync::LazyLock;

/// Current platform information (cached)
///
/// # Example
/// ```
/// use obs2html_core::platform::CURRENT_PLATFORM;
///
/// println!("running on {}/{}", CURRENT_PLATFORM.os, CURRENT_PLATFORM.arch);
/// ```
pub static CURRENT_PLATFORM: LazyLock<Platform> = LazyLock::new(Platform::detect);

/// Platform information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS: "darwin" (macOS), "linux", "windows", "unknown"
    pub os: &'static str,
    /// CPU architecture: "x86_64", "aarch64", etc.
    pub arch: &'static str,
}

impl Platform {
    /// Detect the platform this binary was compiled for
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: std::env::consts::ARCH,
        }
    }

    /// Whether this is macOS
    pub fn is_darwin(&self) -> bool {
        self.os == "darwin"
    }

    const fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "darwin"
        }

        #[cfg(target_os = "linux")]
        {
            "linux"
        }

        #[cfg(target_os = "windows")]
        {
            "windows"
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            "unknown"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_matches_cached() {
        assert_eq!(Platform::detect(), *CURRENT_PLATFORM);
    }

    #[test]
    fn test_darwin_flag_follows_os() {
        let platform = Platform::detect();
        assert_eq!(platform.is_darwin(), platform.os == "darwin");

        #[cfg(target_os = "linux")]
        {
            assert_eq!(platform.os, "linux");
            assert!(!platform.is_darwin());
        }
    }

    #[test]
    fn test_arch_is_not_empty() {
        assert!(!CURRENT_PLATFORM.arch.is_empty());
    }
}
