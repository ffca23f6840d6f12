use crate::commands::input::{collect_inputs, read_json};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use zobject_transcoder::{extract_type_ids, unique_type_ids};

#[derive(Debug, Args)]
pub struct TypeIdsArgs {
    /// Input .json file or directory
    pub input: PathBuf,

    /// Keep repeated ids, in visiting order
    #[arg(short, long)]
    pub all: bool,

    /// Print a JSON object of file → ids
    #[arg(long)]
    pub json: bool,
}

pub fn type_ids(args: TypeIdsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = collect_inputs(&args.input)?;

    let mut report = serde_json::Map::new();
    for file in &files {
        let value = read_json(file)?;
        let ids = if args.all {
            extract_type_ids(&value)
        } else {
            unique_type_ids(&value)
        };

        if args.json {
            report.insert(file.display().to_string(), ids.into());
        } else {
            println!("{}", file.display().to_string().bright_white().bold());
            for id in ids {
                println!("  {}", id);
            }
        }
    }

    if args.json {
        println!("{}", config.to_json(&report)?);
    }
    Ok(())
}
