//! Command-line interface for factbook
//! Runs the rendering pipeline over a saved model response and prints the result.
//!
//! Usage:
//!   factbook execute `<path>` [--config `<name>`] [--sources `<file>`] [--settings `<file>`] [--format `<format>`]
//!   factbook list-configs                                  - List all available configurations
//!   factbook list-formats                                  - List all available output formats

use clap::{Arg, ArgMatches, Command};
use factbook::citation::Source;
use factbook::formats::FormatRegistry;
use factbook::pipeline::{PipelineExecutor, RenderSettings};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let matches = Command::new("factbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render raw model answers into prose segments, charts and citations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("execute")
                .about("Execute a processing configuration on a raw response")
                .arg(
                    Arg::new("path")
                        .help("Path to the raw model response")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Processing configuration (see list-configs)")
                        .default_value("default"),
                )
                .arg(
                    Arg::new("sources")
                        .long("sources")
                        .short('s')
                        .help("JSON file holding the ordered source list"),
                )
                .arg(
                    Arg::new("settings")
                        .long("settings")
                        .help("YAML or JSON file overriding render settings"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'json', 'outline')")
                        .default_value("json"),
                ),
        )
        .subcommand(Command::new("list-configs").about("List available processing configurations"))
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("execute", execute_matches)) => handle_execute_command(execute_matches),
        Some(("list-configs", _)) => {
            handle_list_configs_command();
            Ok(())
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

/// Handle the execute command
fn handle_execute_command(matches: &ArgMatches) -> Result<(), String> {
    let arg = |name: &str| matches.get_one::<String>(name).map(String::as_str);
    let path = arg("path").ok_or("missing path")?;
    let config = arg("config").unwrap_or("default");
    let format = arg("format").unwrap_or("json");

    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading file {}: {}", path, e))?;

    let sources = match arg("sources") {
        Some(sources_path) => load_sources(sources_path)?,
        None => Vec::new(),
    };

    let settings = match arg("settings") {
        Some(settings_path) => RenderSettings::from_path(settings_path).map_err(|e| e.to_string())?,
        None => RenderSettings::default(),
    };

    let executor = PipelineExecutor::new().with_settings(settings);
    let output = executor
        .execute(config, &raw, &sources)
        .map_err(|e| e.to_string())?;
    let rendered = FormatRegistry::with_defaults()
        .serialize(&output, format)
        .map_err(|e| e.to_string())?;

    println!("{}", rendered);
    Ok(())
}

fn load_sources(path: &str) -> Result<Vec<Source>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading sources {}: {}", path, e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid sources {}: {}", path, e))
}

/// Handle the list-configs command
fn handle_list_configs_command() {
    println!("Available processing configurations:\n");
    for config in PipelineExecutor::new().list_configs() {
        println!("  {}", config.name);
        println!("    {}", config.description);
    }
}

fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        let description = registry.get(&name).map(|f| f.description()).unwrap_or_default();
        println!("  {:<10} {}", name, description);
    }
}
