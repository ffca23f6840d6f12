use crate::commands::input::read_json;
use crate::commands::load_document;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RowsArgs {
    /// Input .json file in any encoding
    pub input: PathBuf,

    /// First row id (overrides config)
    #[arg(short, long)]
    pub start_row: Option<u32>,
}

/// Print the row table a ZObject flattens to
pub fn rows(args: RowsArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(start_row) = args.start_row {
        config.start_row = start_row;
    }

    let document = load_document(&read_json(&args.input)?, &config)?;
    println!("{}", config.to_json(document.table())?);
    Ok(())
}
