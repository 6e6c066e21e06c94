use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use odt_document::Document;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Document file to create
    #[arg(default_value = "document.json")]
    pub document: PathBuf,

    /// Member id written to the config
    #[arg(short, long)]
    pub member: Option<String>,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
    let document_path = PathBuf::from(cwd).join(&args.document);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing ODT workspace...".bright_blue().bold());

    let mut config = Config::default();
    if let Some(member) = args.member {
        config.member_id = member;
    }
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if !document_path.exists() || args.force {
        Document::new().save(&document_path)?;
        println!("  {} Created {}", "✓".green(), args.document.display());
    }

    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: odt list {} --type bullet", args.document.display());
    println!("  2. Run: odt inspect {}", args.document.display());

    Ok(())
}
