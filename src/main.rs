//! AppConfig Command Line Tool
//!
//! Runs the configuration bootstrap and prints the resulting configuration,
//! the resolved internal settings or the candidate property files.

use std::io::{self, Write};

use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;

use appconfig::common::{AppConfigError, Result};
use appconfig::config::logging;
use appconfig::config::naming::{generate_configuration_names, ConfigurationKind};
use appconfig::config::resolver::resource_roots;
use appconfig::config::source::system_properties;
use appconfig::config::{ConfigurationBuilder, ExtendedProperties, Options, SettingsResolver};
use appconfig::{load_settings, AppConfig, APP_NAME, VERSION};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `key=value` lines
    Text,
    /// Pretty-printed JSON
    Json,
}

/// AppConfig: layered, environment-aware configuration bootstrap
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Set a system property, e.g. -D appconfig.runTimeEnvironment=test
    #[clap(short = 'D', value_name = "KEY=VALUE")]
    defines: Vec<String>,

    /// Set a programmatic option
    #[clap(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Package holding the property files, e.g. com.example
    #[clap(long)]
    package: Option<String>,

    /// Directory searched before the package directory
    #[clap(long)]
    external_dir: Option<String>,

    /// Run-time environment (development, production, test)
    #[clap(long)]
    environment: Option<String>,

    /// Root that resource names are resolved against (repeatable)
    #[clap(long = "resource-root", value_name = "DIR")]
    resource_roots: Vec<String>,

    /// Print the resolved internal settings instead of the configuration
    #[clap(long)]
    show_settings: bool,

    /// Print the candidate property files instead of the configuration
    #[clap(long)]
    show_files: bool,

    /// Output format
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// One candidate file in the `--show-files` report
#[derive(Debug, Serialize)]
struct FileReport {
    kind: ConfigurationKind,
    name: String,
    required: bool,
    found: Option<String>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    for definition in &args.defines {
        let (name, value) = parse_pair(definition)?;
        system_properties::set(name, value);
    }

    let options = build_options(&args)?;

    if args.show_settings || args.show_files {
        let resolver = SettingsResolver::new(options);
        if let Err(e) = logging::bootstrap(&resolver) {
            eprintln!("Failed to initialize logging: {}", e);
        }
        let settings = load_settings(&resolver)?;

        if args.show_settings {
            print_settings(&settings, args.format)?;
        }
        if args.show_files {
            print_files(&settings, args.format)?;
        }
        return Ok(());
    }

    let mut app = AppConfig::with_options(options);
    let configuration = app.configure()?;
    info!("Starting {} v{}", APP_NAME, VERSION);
    debug!("Configuration layers: {:?}", configuration.layer_names());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => configuration.dump(&mut out)?,
        OutputFormat::Json => writeln!(out, "{}", to_json(&configuration)?)?,
    }

    Ok(())
}

/// Split a `KEY=VALUE` argument
fn parse_pair(definition: &str) -> Result<(String, String)> {
    system_properties::parse_definition(definition).ok_or_else(|| {
        AppConfigError::InvalidValue(definition.to_string(), "expected KEY=VALUE".to_string())
    })
}

/// Collect the programmatic options from the command line
fn build_options(args: &Args) -> Result<Options> {
    let mut options = Options::new();

    for definition in &args.options {
        let (name, value) = parse_pair(definition)?;
        options.set(name, value);
    }
    if let Some(ref package) = args.package {
        options.set_application_properties_package_name(package);
    }
    if let Some(ref dir) = args.external_dir {
        options.set_external_configuration_directory(dir);
    }
    if let Some(ref env) = args.environment {
        options.set_run_time_environment(env);
    }
    if !args.resource_roots.is_empty() {
        options.set_resource_roots(&args.resource_roots);
    }

    Ok(options)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppConfigError::Config(e.to_string()))
}

fn print_settings(settings: &ExtendedProperties, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => settings.dump(&mut out)?,
        OutputFormat::Json => writeln!(out, "{}", to_json(settings)?)?,
    }
    Ok(())
}

fn print_files(settings: &ExtendedProperties, format: OutputFormat) -> Result<()> {
    let roots = resource_roots(settings);

    let mut candidates = generate_configuration_names(settings, ConfigurationKind::Logging)
        .into_iter()
        .map(|candidate| (ConfigurationKind::Logging, candidate))
        .collect::<Vec<_>>();
    candidates.extend(ConfigurationBuilder::new(settings.clone()).candidates());

    let reports: Vec<FileReport> = candidates
        .into_iter()
        .map(|(kind, candidate)| FileReport {
            kind,
            found: candidate.locate(&roots).map(|path| path.display().to_string()),
            name: candidate.name,
            required: candidate.required,
        })
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            for report in &reports {
                writeln!(
                    out,
                    "{:<12} {:<8} {} -> {}",
                    report.kind.to_string(),
                    if report.required { "required" } else { "optional" },
                    report.name,
                    report.found.as_deref().unwrap_or("not found")
                )?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", to_json(&reports)?)?,
    }
    Ok(())
}
