//! Convert command implementation
//!
//! Walks the configured vault and writes one HTML page per note, copying
//! everything else alongside.

use clap::Args;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};
use crate::stats::ConvertStats;
use crate::ui::{create_spinner, progress_bar_or_hidden};
use obs2html_config::{Config, error_report_file};
use obs2html_core::CreationTimeSync;
use obs2html_engine::template::ensure_user_template;
use obs2html_engine::timestamps::{NoopTimeSync, platform_time_sync};
use obs2html_engine::{AbsPath, PandocConverter, PandocOptions, Template, VaultProcessor, plan};

/// Convert command
#[derive(Debug, Default, Args)]
pub struct ConvertCommand {
    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Command for ConvertCommand {
    type Output = ConvertStats;

    fn execute(&self, context: &RuntimeContext) -> Result<ConvertStats> {
        let config = context.load_config()?;
        let converter = PandocConverter::locate(&config.general.pandoc, pandoc_options(&config))?;
        match converter.version() {
            Ok(version) => debug!("{version}"),
            Err(e) => warn!("Could not determine Pandoc version: {e}"),
        }

        self.run_with(&config, converter)
    }
}

impl ConvertCommand {
    fn run_with(&self, config: &Config, converter: PandocConverter) -> Result<ConvertStats> {
        let paths = config.validate().map_err(CommandError::config)?;
        let template = load_template(config, &paths.template)?;

        let report_path = error_report_file();
        if let Some(path) = &report_path
            && path.exists()
        {
            fs::remove_file(path)?;
            debug!("Removed previous error report {}", path.display());
        }

        fs::create_dir_all(&paths.output_dir)?;
        let vault = AbsPath::new(fs::canonicalize(&paths.vault_dir)?)?;
        let output = AbsPath::new(fs::canonicalize(&paths.output_dir)?)?;

        let spinner = create_spinner("Scanning vault...");
        let items = plan(&vault, &config.exclude.folders);
        spinner.finish_and_clear();
        let items = items?;
        info!("Found {} files in {}", items.len(), vault);

        let time_sync: Box<dyn CreationTimeSync> = if config.general.preserve_timestamps {
            platform_time_sync()
        } else {
            Box::new(NoopTimeSync)
        };

        let mut processor = VaultProcessor::new(
            vault,
            output.clone(),
            template,
            converter,
            time_sync,
            &config.convert.resource_dir,
        )
        .with_exclude_properties(config.exclude.frontmatter_properties.clone());

        let show_progress = config.general.progress && !self.no_progress;
        let pb = progress_bar_or_hidden(show_progress, items.len() as u64, "Converting");
        let report = processor.run(&items, |item, _| {
            pb.set_message(item.rel.to_string());
            pb.inc(1);
        });
        pb.finish_and_clear();

        if let Some(path) = &report_path {
            report.save_error_report(path)?;
        }

        let stats = ConvertStats::from(&report);
        stats.print_summary(output.as_path(), report_path.as_deref());

        if report.aborted {
            warn!("Stopped early: the converter is no longer available");
        }
        if report.has_failures() {
            return Err(CommandError::ConversionFailed {
                failed: stats.failed,
                total: stats.total(),
            });
        }

        Ok(stats)
    }
}

/// Conversion switches from the `[convert]` section
pub fn pandoc_options(config: &Config) -> PandocOptions {
    PandocOptions {
        embed_resources: config.convert.embed_resources,
        fail_if_warnings: config.convert.fail_if_warnings,
        hard_line_breaks: config.convert.hard_line_breaks,
    }
}

/// Load the template, seeding the default user template on first use
fn load_template(config: &Config, path: &Path) -> Result<Template> {
    if config.general.template.is_none() && ensure_user_template(path)? {
        info!("Created default template at {}", path.display());
    }
    Ok(Template::load(path)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_pandoc_options_follow_config() {
        let mut config = Config::default();
        assert_eq!(pandoc_options(&config), PandocOptions::default());

        config.convert.embed_resources = false;
        config.convert.hard_line_breaks = false;
        let options = pandoc_options(&config);
        assert!(!options.embed_resources);
        assert!(!options.hard_line_breaks);
        assert!(options.fail_if_warnings);
    }

    #[test]
    fn test_missing_config_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let context = RuntimeContext::new(temp.path().join("config.toml"));
        let err = ConvertCommand::default().execute(&context).unwrap_err();
        assert!(matches!(err, CommandError::NotConfigured(_)));
    }
}
