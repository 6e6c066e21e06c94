use super::{append_log, print_report};
use crate::config::Config;
use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;
use colored::Colorize;
use odt_editor::{ImageController, Session, SessionContext};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Document file
    pub document: PathBuf,

    /// Image file (png, jpg, gif)
    pub image: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: f64,

    /// Image height in pixels
    #[arg(long)]
    pub height: f64,

    /// Cursor position to insert at
    #[arg(short, long, default_value_t = 0)]
    pub position: usize,

    /// Operation log to append the applied operations to
    #[arg(long)]
    pub log: Option<PathBuf>,
}

pub fn image(args: ImageArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mimetype = mimetype_for(&args.image)?;
    let content = STANDARD.encode(std::fs::read(&args.image)?);

    let mut session = Session::open(&args.document)?;
    let mut controller = ImageController::new(SessionContext::new(config.member_id.clone()))
        .with_page_content_size(config.page_content_size());

    println!(
        "{} Inserting {} at {}",
        "🖼️".bright_blue(),
        args.image.display(),
        args.position
    );
    let report = controller.insert_image_at(
        &mut session,
        args.position,
        mimetype,
        &content,
        args.width,
        args.height,
    )?;
    print_report(&report);

    session.document().save(&args.document)?;
    if let Some(log) = &args.log {
        append_log(log, &report.applied)?;
    }

    println!();
    println!("{} {}", "✅ Saved".green().bold(), args.document.display());
    Ok(())
}

fn mimetype_for(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        _ => Err(anyhow!(
            "Unsupported image file: {} (expected png, jpg or gif)",
            path.display()
        )),
    }
}
