use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use xsdgen_core::{ExportResult, ExporterConfig, LogSink, Priority};
use xsdgen_engine::SchemaExporter;
use xsdgen_metadata::ManifestProvider;

mod args;

use args::Cli;

const DEFAULT_CONFIG: &str = "xsdgen.toml";

/// Prints log lines to the console, colored by priority
struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_line(&self, priority: Priority, message: &str) {
        match priority {
            Priority::Normal => eprintln!("{}", message),
            Priority::Warning => eprintln!("{}", message.yellow()),
            Priority::Error => eprintln!("{}", message.red()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.modules.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    match export_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), format!("{:#}", err).red());
            eprintln!();
            print_help();
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    let mut command = Cli::command();
    if command.print_help().is_err() {
        eprintln!("Usage: xsdgen [OPTIONS] [MODULE]...");
    }
}

/// Export command - write one schema file per generated schema document
fn export_command(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    cli.apply_to(&mut config);
    tracing::debug!(?config, "effective configuration");

    if cli.verbose {
        eprintln!("{} {}", "Output directory:".cyan(), config.output_directory.display());
        eprintln!("{} {}", "Encoding:".cyan(), config.output_encoding);
    }

    let modules = module_paths(&cli.modules, &config);
    if modules.is_empty() {
        print_help();
        return Ok(());
    }

    let include_names = cli.include_names();
    let provider = ManifestProvider::new();
    let sink = ConsoleSink;

    let exporter = SchemaExporter::new(config, &provider, &sink);
    let result = exporter.export_schemas(&modules, &include_names)?;

    print_summary(&result);

    if let Some(report_path) = &cli.report {
        result
            .save_to_file(report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;

        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), report_path.display());
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ExporterConfig> {
    let config = if let Some(config_path) = &cli.config {
        ExporterConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        ExporterConfig::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        ExporterConfig::default()
    };

    Ok(config)
}

/// Keep the paths with a module extension, warning about the others
fn module_paths(paths: &[PathBuf], config: &ExporterConfig) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let accepted = config.is_module_path(path);
            if !accepted {
                ConsoleSink.write_line(
                    Priority::Warning,
                    &format!("Ignoring '{}': not a module file.", path.display()),
                );
            }
            accepted
        })
        .cloned()
        .collect()
}

fn print_summary(result: &ExportResult) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "XML Schema Export".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    if result.has_validation_warnings() {
        println!("{}", "The XML schema validation completed with warnings.".yellow());
        println!(
            "  Errors:   {}",
            result.summary().errors.to_string().red().bold()
        );
        println!(
            "  Warnings: {}",
            result.summary().warnings.to_string().yellow()
        );
        println!();
    }

    if result.exported_schemas().is_empty() {
        println!("{}", "No schema files were written.".yellow());
    } else {
        println!("{}", "The following files were written:".bold());
        for item in result.exported_schemas() {
            match &item.type_descriptor {
                Some(ty) => println!("- {} for type {}", item.filename.green(), ty.full_name),
                None => println!("- {}", item.filename.green()),
            }
        }
    }

    println!("{}", "=".repeat(60).bright_blue());
}
