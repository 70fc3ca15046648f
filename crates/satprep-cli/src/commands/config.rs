//! Config command

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use anyhow::{bail, Result};
use satprep_core::Config;
use std::path::Path;

const MASK: &str = "********";

pub fn run(args: ConfigArgs, config: &Config, path: &Path, format: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let masked = masked(config);
            let text = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&masked)? + "\n",
                OutputFormat::Cli => serde_yaml::to_string(&masked)?,
            };
            print!("{}", text);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(path)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

fn masked(config: &Config) -> Config {
    let mut c = config.clone();
    let mask = |v: &mut Option<String>| {
        if v.is_some() {
            *v = Some(MASK.to_string());
        }
    };
    mask(&mut c.llm_service.api_key);
    mask(&mut c.llm_service.embedding_api_key);
    mask(&mut c.index.api_key);
    c
}
