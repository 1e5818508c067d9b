//! Info command implementation
//!
//! Display version, build, configuration and converter information.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::cmd::convert::pandoc_options;
use crate::error::Result;
use obs2html_config::Config;
use obs2html_core::platform::CURRENT_PLATFORM;
use obs2html_engine::{PandocConverter, Template};

const NOT_FOUND: &str = "not found";
const NOT_CONFIGURED: &str = "not configured";

/// Everything `info` reports
#[derive(Debug, Serialize)]
pub struct InfoData {
    obs2html: AppInfo,
    build: BuildInfo,
    system: SystemInfo,
    vault: Option<VaultInfo>,
    template: Option<TemplateInfo>,
    pandoc: PandocInfo,
}

#[derive(Debug, Serialize)]
struct AppInfo {
    version: &'static str,
    config: String,
    config_exists: bool,
}

#[derive(Debug, Serialize)]
struct BuildInfo {
    rustc: Option<&'static str>,
    host: Option<&'static str>,
    timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct SystemInfo {
    os: &'static str,
    architecture: &'static str,
}

#[derive(Debug, Serialize)]
struct VaultInfo {
    vault_dir: Option<String>,
    vault_exists: bool,
    output_dir: Option<String>,
    excluded_folders: Vec<String>,
    exclude_properties: Vec<String>,
    resource_dir: String,
}

#[derive(Debug, Serialize)]
struct TemplateInfo {
    path: String,
    exists: bool,
    declared_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PandocInfo {
    program: String,
    path: Option<String>,
    version: Option<String>,
}

/// Info command
#[derive(Debug, Default, Args)]
pub struct InfoCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl Command for InfoCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let config = if context.config_exists() {
            Some(context.load_config()?)
        } else {
            None
        };
        let info = gather_info(&context.config_path, config.as_ref());

        if self.json {
            let output = serde_json::to_string_pretty(&info)
                .map_err(|e| anyhow::anyhow!("Failed to serialize info: {e}"))?;
            println!("{output}");
        } else {
            display_table(&info);
        }
        Ok(())
    }
}

/// Collect information about this installation
pub fn gather_info(config_path: &Path, config: Option<&Config>) -> InfoData {
    debug!("Gathering system information");

    let build = BuildInfo {
        rustc: option_env!("VERGEN_RUSTC_SEMVER"),
        host: option_env!("VERGEN_RUSTC_HOST_TRIPLE"),
        timestamp: option_env!("VERGEN_BUILD_TIMESTAMP").and_then(|s| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        }),
    };

    let vault = config.map(|config| VaultInfo {
        vault_dir: config.vault_dir().map(|p| p.display().to_string()),
        vault_exists: config.vault_dir().is_some_and(|p| p.is_dir()),
        output_dir: config.output_dir().map(|p| p.display().to_string()),
        excluded_folders: config.exclude.folders.clone(),
        exclude_properties: config.exclude.frontmatter_properties.clone(),
        resource_dir: config.convert.resource_dir.clone(),
    });

    let template = config.and_then(Config::template_path).map(|path| {
        let declared_keys = Template::load(&path)
            .map(|t| t.declared_keys().iter().cloned().collect())
            .unwrap_or_default();
        TemplateInfo {
            exists: path.is_file(),
            path: path.display().to_string(),
            declared_keys,
        }
    });

    let program = config.map_or_else(|| "pandoc".to_string(), |c| c.general.pandoc.clone());
    let options = config.map(pandoc_options).unwrap_or_default();
    let pandoc = match PandocConverter::locate(&program, options) {
        Ok(converter) => PandocInfo {
            path: Some(converter.program().display().to_string()),
            version: converter.version().ok(),
            program,
        },
        Err(e) => {
            debug!("{e}");
            PandocInfo {
                program,
                path: None,
                version: None,
            }
        }
    };

    InfoData {
        obs2html: AppInfo {
            version: env!("CARGO_PKG_VERSION"),
            config: config_path.display().to_string(),
            config_exists: config.is_some(),
        },
        build,
        system: SystemInfo {
            os: CURRENT_PLATFORM.os,
            architecture: CURRENT_PLATFORM.arch,
        },
        vault,
        template,
        pandoc,
    }
}

fn print_section_header(name: &str) {
    println!("{}", name.bright_white().bold());
}

/// Display information in table format
fn display_table(info: &InfoData) {
    display_app_section(&info.obs2html);
    display_build_section(&info.build, &info.system);
    display_vault_section(info.vault.as_ref());
    display_template_section(info.template.as_ref());
    display_pandoc_section(&info.pandoc);
}

fn display_app_section(app: &AppInfo) {
    print_section_header("obs2html");
    print_row("Version", app.version, true, None);
    print_row(
        "Config",
        &app.config,
        app.config_exists,
        (!app.config_exists).then_some(NOT_FOUND),
    );
    println!();
}

fn display_build_section(build: &BuildInfo, system: &SystemInfo) {
    print_section_header("Build");
    if let Some(rustc) = build.rustc {
        print_row("Rustc", rustc, true, None);
    }
    if let Some(host) = build.host {
        print_row("Host", host, true, None);
    }
    if let Some(time) = build.timestamp.as_ref() {
        print_row("Timestamp", time, true, None);
    }
    print_row("OS", system.os, true, None);
    print_row("Architecture", system.architecture, true, None);
    println!();
}

fn display_vault_section(vault: Option<&VaultInfo>) {
    print_section_header("Vault");
    let Some(vault) = vault else {
        print_row("Vault", "-", false, Some(NOT_CONFIGURED));
        println!();
        return;
    };

    match vault.vault_dir.as_deref() {
        Some(dir) => print_row(
            "Vault",
            dir,
            vault.vault_exists,
            (!vault.vault_exists).then_some(NOT_FOUND),
        ),
        None => print_row("Vault", "-", false, Some(NOT_CONFIGURED)),
    }
    match vault.output_dir.as_deref() {
        Some(dir) => print_row("Output", dir, true, None),
        None => print_row("Output", "-", false, Some(NOT_CONFIGURED)),
    }
    print_row("Excluded", &vault.excluded_folders.join(", "), true, None);
    if !vault.exclude_properties.is_empty() {
        print_row("Skip if set", &vault.exclude_properties.join(", "), true, None);
    }
    print_row("Resources", &vault.resource_dir, true, None);
    println!();
}

fn display_template_section(template: Option<&TemplateInfo>) {
    let Some(template) = template else {
        return;
    };
    print_section_header("Template");
    print_row(
        "Path",
        &template.path,
        template.exists,
        (!template.exists).then_some("created on first convert"),
    );
    if !template.declared_keys.is_empty() {
        print_row("Variables", &template.declared_keys.join(", "), true, None);
    }
    println!();
}

fn display_pandoc_section(pandoc: &PandocInfo) {
    print_section_header("Pandoc");
    match pandoc.path.as_deref() {
        Some(path) => {
            print_row("Path", path, true, None);
            if let Some(version) = pandoc.version.as_deref() {
                print_row("Version", version, true, None);
            }
        }
        None => print_row("Path", &pandoc.program, false, Some(NOT_FOUND)),
    }
}

fn print_row(label: &str, value: &str, ok: bool, note: Option<&str>) {
    let symbol = if ok {
        "✓".bright_green().to_string()
    } else if note.is_some() {
        "✗".bright_red().to_string()
    } else {
        "⚠".yellow().to_string()
    };

    let formatted_value = if ok {
        value.bright_white().to_string()
    } else {
        value.dimmed().to_string()
    };

    if let Some(note_text) = note {
        println!(
            "  {} {:14} {} {}",
            symbol,
            label,
            formatted_value,
            format!("({note_text})").dimmed()
        );
    } else {
        println!("  {symbol} {label:14} {formatted_value}");
    }
}
