use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use td::io::config_io::{self, ConfigError};
use td::parse::{BLOCK_MARKER, extract_blocks, parse_blocks};

#[derive(Parser)]
#[command(name = "td", version, about = "Hierarchical todos embedded in plain text files")]
struct Cli {
    /// Path to the todo file (overrides config)
    #[arg(short = 'f', long = "todo-file")]
    todo_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let todo_path = match resolve_path(&cli) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Some(dir) = todo_path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("error: could not create {}: {}", dir.display(), e);
            process::exit(1);
        }
    }

    if !todo_path.exists() {
        eprintln!(
            "todo file '{}' does not exist; create it and run again",
            todo_path.display()
        );
        process::exit(1);
    }

    // Unreadable file is fatal at startup; warnings are carried into the TUI.
    let content = match fs::read_to_string(&todo_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error: could not read {}: {}", todo_path.display(), e);
            process::exit(1);
        }
    };
    let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    let (blocks, mut warnings) = extract_blocks(&lines);
    if blocks.is_empty() {
        println!(
            "no {} blocks found in {}; no todos in scope",
            BLOCK_MARKER,
            todo_path.display()
        );
        return;
    }
    let (todos, parse_warnings) = parse_blocks(&blocks);
    warnings.extend(parse_warnings);

    if let Err(e) = td::tui::run(&todo_path, todos, warnings) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn resolve_path(cli: &Cli) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &cli.todo_file {
        return Ok(path.clone());
    }
    let config = config_io::load_or_create(&config_io::config_path()?)?;
    config_io::resolve_todo_path(&config)
}
