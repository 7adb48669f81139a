//! Command-line interface for htmlmixed
//! This binary highlights a document with one of the registered modes and prints the styled spans.
//!
//! Usage:
//!   htmlmixed `<path>` [--mime `<mime>`] [--format simple|json]   - Highlight a file
//!   htmlmixed --list-modes                                      - List registered modes and MIME types

use clap::{value_parser, Arg, ArgAction, Command};
use htmlmixed::{ModeRegistry, StyledSpan};
use htmlmixed_config::Loader;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("htmlmixed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Highlight html documents with embedded javascript and css")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the document")
                .required_unless_present("list-modes")
                .index(1),
        )
        .arg(
            Arg::new("mime")
                .long("mime")
                .short('m')
                .help("MIME type selecting the mode (e.g., 'text/html', 'text/css')")
                .default_value("text/html"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["simple", "json"])
                .default_value("simple"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the default configuration"),
        )
        .arg(
            Arg::new("indent-unit")
                .long("indent-unit")
                .help("Override the indentation unit")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log mode switches to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-modes")
                .long("list-modes")
                .help("List registered modes and MIME types")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let registry = load_registry(
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<usize>("indent-unit").copied(),
    );

    if matches.get_flag("list-modes") {
        handle_list_modes_command(&registry);
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing modes");
    let mime = matches.get_one::<String>("mime").unwrap();
    let format = matches.get_one::<String>("format").unwrap();
    handle_highlight_command(&registry, path, mime, format);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("htmlmixed=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Build the registry from the layered configuration
fn load_registry(config: Option<&str>, indent_unit: Option<usize>) -> ModeRegistry {
    let mut loader = Loader::new();
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    if let Some(unit) = indent_unit {
        loader = loader.with_indent_unit(unit).unwrap_or_else(|e| {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        });
    }
    let config = loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    ModeRegistry::with_defaults(&config.mode_options()).unwrap_or_else(|e| {
        eprintln!("Mode error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the highlight command
fn handle_highlight_command(registry: &ModeRegistry, path: &str, mime: &str, format: &str) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading '{}': {}", path, e);
        std::process::exit(1);
    });

    let spans = registry.highlight_mime(mime, &source).unwrap_or_else(|e| {
        eprintln!("Highlight error: {}", e);
        eprintln!("\nAvailable MIME types:");
        for (mime, mode) in registry.mime_types() {
            eprintln!("  {} -> {}", mime, mode);
        }
        std::process::exit(1);
    });

    let formatted = match format {
        "json" => serde_json::to_string_pretty(&spans).unwrap_or_else(|e| {
            eprintln!("Error formatting spans: {}", e);
            std::process::exit(1);
        }),
        _ => format_simple(&spans),
    };

    println!("{}", formatted);
}

/// One span per line: `line:start-end mode style "text"`
fn format_simple(spans: &[StyledSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            format!(
                "{}:{}-{} {} {} {:?}",
                span.line + 1,
                span.start,
                span.end,
                span.mode,
                span.style.map_or("-", |style| style.as_str()),
                span.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Handle the list-modes command
fn handle_list_modes_command(registry: &ModeRegistry) {
    println!("Available modes:\n");
    for name in registry.available() {
        println!("  {}", name);
    }

    println!("\nMIME types:\n");
    for (mime, mode) in registry.mime_types() {
        println!("  {} -> {}", mime, mode);
    }
}
