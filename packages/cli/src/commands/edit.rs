use crate::commands::input::read_json;
use crate::commands::{check_namespace, load_document};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use zobject_editor::{EditSession, Mutation};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// ZObject to edit, in any encoding
    pub input: PathBuf,

    /// JSON array of mutations to apply in order
    pub mutations: PathBuf,

    /// Extra tree to load, as `name=path` (repeatable)
    #[arg(short, long = "load", value_name = "NAME=PATH")]
    pub loads: Vec<String>,

    /// Namespace to write out (overrides config)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(namespace) = args.namespace.clone() {
        config.namespace = namespace;
    }

    let mut document = load_document(&read_json(&args.input)?, &config)?;
    for load in &args.loads {
        let (name, path) = load
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected NAME=PATH, got: {}", load))?;
        document.load_namespace(name, &read_json(&PathBuf::from(path))?)?;
    }

    check_namespace(&document, &config.namespace)?;

    let mutations: Vec<Mutation> = serde_json::from_value(read_json(&args.mutations)?)?;
    info!(count = mutations.len(), "Applying mutations");

    let mut session = EditSession::new("cli", document);
    for mutation in mutations {
        session.enqueue(mutation);
    }

    let mut error_count = 0;
    for outcome in session.flush() {
        match outcome.result {
            Ok(result) => eprintln!(
                "  {} {} (version {}, {} rows)",
                "✓".green(),
                outcome.id,
                result.version,
                result.row_count
            ),
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), outcome.id, e.to_string().red());
            }
        }
    }

    let output = config.to_json(&session.save(&config.namespace)?)?;
    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", output),
    }

    if error_count > 0 {
        eprintln!("{} {} mutations were dropped", "⚠️".yellow(), error_count);
    }
    Ok(())
}
