mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    edit, init, rows, transcode, type_ids, EditArgs, InitArgs, RowsArgs, TranscodeArgs,
    TypeIdsArgs,
};

/// ZObject CLI - transcode and edit ZObjects
#[derive(Parser, Debug)]
#[command(name = "zobject")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a zobject.config.json
    Init(InitArgs),

    /// Convert between Normal, Canonical and Hybrid encodings
    Transcode(TranscodeArgs),

    /// List the type ids a ZObject refers to
    TypeIds(TypeIdsArgs),

    /// Print the row table of a ZObject
    Rows(RowsArgs),

    /// Apply a list of mutations and print the result
    Edit(EditArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Transcode(args) => transcode(args, &cwd),
        Command::TypeIds(args) => type_ids(args, &cwd),
        Command::Rows(args) => rows(args, &cwd),
        Command::Edit(args) => edit(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
