//! Tool to check where every internal setting comes from

use std::process::exit;

use appconfig::config::source::system_properties;
use appconfig::config::{check_warnings, defaults, Options, SettingsResolver, ValueSource};

fn main() {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    // -D key=value arguments feed the system property registry
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let definition = match arg.strip_prefix("-D") {
            Some("") => args.next(),
            Some(rest) => Some(rest.to_string()),
            None => {
                eprintln!("Unexpected argument: {} (only -D KEY=VALUE is accepted)", arg);
                exit(2);
            }
        };
        match definition.as_deref().and_then(system_properties::parse_definition) {
            Some((name, value)) => {
                system_properties::set(name, value);
            }
            None => {
                eprintln!("Invalid system property definition: {:?}", definition);
                exit(2);
            }
        }
    }

    println!("=== AppConfig Environment Check ===\n");

    let resolver = SettingsResolver::new(Options::new());
    let defaults_file = match resolver.load_defaults() {
        Ok(defaults_file) => defaults_file,
        Err(e) => {
            println!("Failed to load the internal defaults: {}", e);
            exit(1);
        }
    };

    println!("Internal settings:");
    for name in defaults_file.names() {
        match resolver.setting_with_source(&name, &defaults_file) {
            Some((value, source)) => {
                let marker = if source == ValueSource::Defaults { " " } else { "*" };
                println!("  {} {:<55} {:<20} [{}]", marker, name, value.to_string(), source);
            }
            None => println!("    {:<55} (unset)", name),
        }
    }
    println!("\n  * overridden by options, system properties or environment");

    let settings = match resolver.load_internal_properties() {
        Ok(settings) => settings,
        Err(e) => {
            println!("\nFailed to resolve the internal settings: {}", e);
            exit(1);
        }
    };

    let warnings = check_warnings(&settings);
    if warnings.is_empty() {
        println!("\nNo issues found.");
    } else {
        println!("\nIssues:");
        for warning in &warnings {
            println!("  [WARNING] {}", warning);
        }
    }

    if let Err(e) = appconfig::config::validate_settings(&settings) {
        println!("  [ERROR  ] {}", e);
        exit(1);
    }

    let requested = settings.get_string(defaults::RUN_TIME_ENVIRONMENT);
    let permitted = settings
        .get_list(defaults::PERMITTED_RUN_TIME_ENVIRONMENTS)
        .unwrap_or_default();
    let known = requested
        .as_deref()
        .map_or(false, |env| permitted.iter().any(|p| p.eq_ignore_ascii_case(env)));

    println!("\n=== Summary ===");
    if known {
        println!("Run-time environment: {}", requested.unwrap_or_default());
    } else {
        println!(
            "Unknown run-time environment {:?}; permitted: {}",
            requested.unwrap_or_default(),
            permitted.join(", ")
        );
        exit(1);
    }
}
