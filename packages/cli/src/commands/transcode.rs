use crate::commands::input::{collect_inputs, read_json};
use crate::config::Config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use zobject_transcoder::{canonical_to_hybrid, canonicalize_value, normalize, normalize_strict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Canonical,
    Normal,
    Hybrid,
}

#[derive(Debug, Args)]
pub struct TranscodeArgs {
    /// Input .json file or directory
    pub input: PathBuf,

    /// Target encoding
    #[arg(short, long, value_enum, default_value = "canonical")]
    pub to: Encoding,

    /// Output directory; a single file prints to stdout without one
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Reject Normal lists whose cells lack a tail (overrides config)
    #[arg(long)]
    pub strict: bool,
}

pub fn transcode(args: TranscodeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let strict = args.strict || config.strict_lists;
    let files = collect_inputs(&args.input)?;

    if files.len() == 1 && args.out_dir.is_none() {
        let output = transcode_value(read_json(&files[0])?, args.to, strict)?;
        println!("{}", config.to_json(&output)?);
        return Ok(());
    }

    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(cwd).join("out"));

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&args.input).unwrap_or(file);
        match transcode_file(file, &out_dir.join(relative_path), &args, strict, &config) {
            Ok(()) => {
                success_count += 1;
                println!("  {} {}", "✓".green(), relative_path.display());
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} Transcoded {} files", "✅".green(), success_count);
    } else {
        println!(
            "{} Transcoded {} files, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

fn transcode_file(
    file: &Path,
    output_file: &Path,
    args: &TranscodeArgs,
    strict: bool,
    config: &Config,
) -> Result<()> {
    let output = transcode_value(read_json(file)?, args.to, strict)?;

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_file, config.to_json(&output)?)?;
    Ok(())
}

/// Convert a ZObject in any encoding to `to`
pub fn transcode_value(value: Value, to: Encoding, strict: bool) -> Result<Value> {
    debug!(?to, strict, "Transcoding");
    let value = if strict { normalize_strict(&value)? } else { value };

    Ok(match to {
        Encoding::Canonical => canonicalize_value(&value),
        Encoding::Normal => normalize(&value),
        Encoding::Hybrid => canonical_to_hybrid(&canonicalize_value(&value)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcode_value() {
        let canonical = json!({ "Z1K1": "Z11", "Z11K1": "Z1002", "Z11K2": "hi" });
        let normal = transcode_value(canonical.clone(), Encoding::Normal, false).unwrap();
        assert_eq!(normal["Z11K2"], json!({ "Z1K1": "Z6", "Z6K1": "hi" }));

        let hybrid = transcode_value(normal, Encoding::Hybrid, false).unwrap();
        assert_eq!(hybrid["Z1K1"], json!({ "Z1K1": "Z9", "Z9K1": "Z11" }));

        let back = transcode_value(hybrid, Encoding::Canonical, false).unwrap();
        assert_eq!(back, canonical);
    }

    #[test]
    fn test_strict_rejects_missing_tail() {
        let broken = json!({
            "Z1K1": {
                "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z7" },
                "Z7K1": { "Z1K1": "Z9", "Z9K1": "Z881" },
                "Z881K1": { "Z1K1": "Z9", "Z9K1": "Z6" }
            },
            "K1": { "Z1K1": "Z6", "Z6K1": "a" }
        });
        assert!(transcode_value(broken.clone(), Encoding::Canonical, true).is_err());
        assert_eq!(
            transcode_value(broken, Encoding::Canonical, false).unwrap(),
            json!(["Z6", "a"])
        );
    }
}
