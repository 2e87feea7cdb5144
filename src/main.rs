//! Editor Compiler CLI
//!
//! Usage:
//!   editor-compiler [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Editor settings file (TOML format)
//!   -r, --render         Print the editor markup instead of compiling content
//!   -o, --options        Print the client options payload as JSON
//!   -d, --debug          Log pipeline stages to stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use editor_compiler::{EditorError, Settings};

#[derive(Parser)]
#[command(name = "editor-compiler")]
#[command(about = "Compile rich editor content into displayable HTML")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Editor settings file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the editor markup instead of compiling content
    #[arg(short, long)]
    render: bool,

    /// Print the client options payload as JSON
    #[arg(short, long)]
    options: bool,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let settings = match &cli.config {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let editor = match settings.build_editor() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.options {
        let printed = editor.options().and_then(|options| {
            serde_json::to_string_pretty(&options).map_err(EditorError::from)
        });
        match printed {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.render {
        match editor.render() {
            Ok(html) => println!("{}", html),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match editor.compile(&source) {
        Ok(html) => {
            println!("{}", html);
        }
        Err(EditorError::Selector { selector, source }) => {
            eprint!("{}", source.format(&selector));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
