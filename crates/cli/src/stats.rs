//! Statistics for a conversion run

use obs2html_engine::RunReport;
use owo_colors::OwoColorize;
use std::path::Path;

/// Counts shown after a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    /// Notes rendered to HTML
    pub converted: usize,
    /// Assets copied
    pub copied: usize,
    /// Notes excluded by frontmatter
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
}

impl From<&RunReport> for ConvertStats {
    fn from(report: &RunReport) -> Self {
        Self {
            converted: report.converted,
            copied: report.copied,
            skipped: report.skipped.len(),
            failed: report.failures.len(),
        }
    }
}

impl ConvertStats {
    /// Files written to the output directory
    pub fn written(&self) -> usize {
        self.converted + self.copied
    }

    /// Every file handled, including skips and failures
    pub fn total(&self) -> usize {
        self.written() + self.skipped + self.failed
    }

    /// Breakdown line, e.g. "12 notes, 3 assets, 1 skipped"
    pub fn breakdown(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("{} {}", self.converted, plural(self.converted, "note", "notes")));
        if self.copied > 0 {
            parts.push(format!("{} {}", self.copied, plural(self.copied, "asset", "assets")));
        }
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        parts.join(", ")
    }

    /// Print the coloured summary
    pub fn print_summary(&self, output_dir: &Path, error_report: Option<&Path>) {
        let written = self.written();

        if self.failed > 0 {
            println!(
                "{} {} | {} {}",
                "●".bright_green(),
                written.to_string().bright_green().bold(),
                "●".bright_red(),
                self.failed.to_string().bright_red().bold(),
            );
        } else {
            println!(
                "{} {} converted into {}",
                "●".bright_green(),
                written.to_string().bright_green().bold(),
                output_dir.display().bright_white()
            );
        }

        println!("  {}", self.breakdown().dimmed());

        if self.failed > 0
            && let Some(path) = error_report
        {
            println!(
                "  {} {}",
                "Details:".yellow(),
                path.display().to_string().bright_white()
            );
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
