//! synpane - print a source file with syntax highlighting

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use synpane::components::Sessions;
use synpane::render::Painter;
use synpane::syntax::LanguageRegistry;
use synpane::{Config, Finder, PaneError, Result, SearchQuery, SyntaxDocument};

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    no_line_numbers: bool,
    caret: Option<usize>,
    find: Option<String>,
    regex: bool,
    ignore_case: bool,
    lang: Option<String>,
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr, filtered by RUST_LOG (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(opts) = parse_args(&args)? else {
        return Ok(());
    };
    let Some(path) = opts.file.as_ref() else {
        print_usage();
        return Err(PaneError::Message("no input file".to_string()));
    };

    let config = Config::load();
    let registry = LanguageRegistry::new();
    let lexer = match &opts.lang {
        Some(name) => Some(registry.create(name)?),
        None => registry.for_path(path)?,
    };
    let text = fs::read_to_string(path)?;
    let doc = SyntaxDocument::with_text(lexer, &text).with_undo_limit(config.undo_limit);
    debug!(document = %doc, lines = doc.line_count(), "loaded");

    if let Some(pattern) = &opts.find {
        let query = SearchQuery::new(pattern, opts.regex, opts.ignore_case)?;
        let finder = Finder::new(query, config.wrap_search);
        for hit in finder.mark_all(&doc) {
            let buffer = doc.buffer();
            let line = buffer.line_number_at(hit.start);
            println!("{}:{}", line + 1, buffer.column_at(hit.start) + 1);
        }
        return Ok(());
    }

    let mut components = config.components.clone();
    if opts.no_line_numbers || !config.show_line_numbers {
        components.retain(|c| c != "line-numbers");
    }
    let mut sessions = Sessions::new();
    let session = sessions.open();
    sessions.install(session, &components, &doc)?;
    if let Some(caret) = opts.caret {
        sessions.caret_moved(session, &doc, caret.min(doc.len()));
    }

    let mut painter = Painter::new(io::stdout().lock()).with_tab_size(config.tab_size);
    painter.paint(&doc, &config.style_table(), &sessions.decorations(session))?;
    sessions.uninstall(session);
    Ok(())
}

/// Parse arguments; `None` when a help or version flag was handled
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--no-line-numbers" | "-n" => opts.no_line_numbers = true,
            "--regex" => opts.regex = true,
            "--ignore-case" => opts.ignore_case = true,
            "--caret" => {
                let value = next_value(&mut iter, arg)?;
                let caret = value
                    .parse::<usize>()
                    .map_err(|_| PaneError::Message(format!("invalid caret offset: {}", value)))?;
                opts.caret = Some(caret);
            }
            "--find" => opts.find = Some(next_value(&mut iter, arg)?.to_string()),
            "--lang" => opts.lang = Some(next_value(&mut iter, arg)?.to_string()),
            s if s.starts_with('-') => {
                return Err(PaneError::Message(format!("unknown option: {}", s)));
            }
            s => opts.file = Some(PathBuf::from(s)),
        }
    }
    Ok(Some(opts))
}

fn next_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a str> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| PaneError::Message(format!("{} needs a value", flag)))
}

fn print_usage() {
    println!("synpane {} - syntax highlighted file viewer", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: synpane [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -n, --no-line-numbers  Hide the line number gutter");
    println!("      --caret OFFSET     Mark the bracket pair at byte OFFSET");
    println!("      --find PATTERN     Print line:column of every match instead");
    println!("      --regex            Treat PATTERN as a regular expression");
    println!("      --ignore-case      Match PATTERN case-insensitively");
    println!("      --lang NAME        Force a language (C, Rust, Python)");
    println!("  -h, --help             Show this help message");
    println!("  -V, --version          Show version information");
    println!();
    println!("Settings are read from ~/.synpane.toml; set RUST_LOG=debug for diagnostics.");
}

fn print_version() {
    println!("synpane {}", env!("CARGO_PKG_VERSION"));
}
