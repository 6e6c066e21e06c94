use super::{append_log, print_report};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use odt_document::Cursor;
use odt_editor::{ListController, ListType, Session, SessionContext};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Document file
    pub document: PathBuf,

    /// List type (bullet, number)
    #[arg(short, long, default_value = "bullet")]
    pub r#type: String,

    /// Cursor position of the paragraph to turn into a list
    #[arg(short, long, default_value_t = 0)]
    pub position: usize,

    /// Selection length
    #[arg(short, long, default_value_t = 0)]
    pub length: usize,

    /// Operation log to append the applied operations to
    #[arg(long)]
    pub log: Option<PathBuf>,
}

pub fn list(args: ListArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let list_type: ListType = args.r#type.parse()?;

    let mut session = Session::open(&args.document)?;
    let controller = ListController::new(SessionContext::new(config.member_id));
    let selection = Cursor {
        position: args.position,
        length: args.length,
    };

    println!(
        "{} {} list at {}",
        "📋".bright_blue(),
        list_type.to_string().bright_white(),
        args.position
    );
    let report = controller.add_list_at(&mut session, selection, list_type)?;
    print_report(&report);

    session.document().save(&args.document)?;
    if let Some(log) = &args.log {
        append_log(log, &report.applied)?;
    }

    println!();
    println!("{} {}", "✅ Saved".green().bold(), args.document.display());
    Ok(())
}
