use super::print_report;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use odt_editor::{load_log, Session};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document file to apply the log to
    pub document: PathBuf,

    /// Operation log (JSON array of operation specs)
    pub log: PathBuf,

    /// Write the result here instead of overwriting the document
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn replay(args: ReplayArgs, _cwd: &str) -> Result<()> {
    let specs = load_log(&args.log)?;
    info!(count = specs.len(), log = %args.log.display(), "Replaying operations");

    println!(
        "{} Replaying {} operations from {}",
        "🔁".bright_blue(),
        specs.len(),
        args.log.display()
    );

    let mut session = Session::open(&args.document)?;
    let report = session.replay(specs)?;
    print_report(&report);

    let output = args.output.as_ref().unwrap_or(&args.document);
    session.document().save(output)?;

    println!();
    println!("{} {}", "✅ Saved".green().bold(), output.display());
    Ok(())
}
