//! Show the effective configuration

use crate::system_config;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(explicit: Option<&Path>, example: bool, color: bool) -> Result<()> {
    if example {
        print!("{}", system_config::example_config());
        return Ok(());
    }

    let config = system_config::load(explicit)?;
    let source = system_config::config_file_path(explicit)
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let body = toml::to_string_pretty(&config).context("Failed to serialize config")?;

    if color {
        println!("{}", "Sync Configuration".bold());
        println!("{}: {}\n", "Location".dimmed(), source.dimmed());
    } else {
        println!("Sync Configuration");
        println!("Location: {}\n", source);
    }
    print!("{}", body);
    Ok(())
}
