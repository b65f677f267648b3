//! Initialize a kgrag project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let base_path = match path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    println!("{} Initializing kgrag project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if config_path.exists() {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    } else {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  {} kgrag extract raw_text.txt", "1.".blue());
    println!("  {} kgrag load", "2.".blue());
    println!("  {} kgrag query \"your question\"", "3.".blue());
    println!("  {} kgrag serve", "4.".blue());

    Ok(())
}
