pub mod image;
pub mod init;
pub mod inspect;
pub mod list;
pub mod replay;

pub use image::{image, ImageArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use list::{list, ListArgs};
pub use replay::{replay, ReplayArgs};

use anyhow::Result;
use colored::Colorize;
use odt_editor::{load_log, EnqueueReport, OperationSpec};
use std::path::Path;

/// Append applied specs to an operation log, creating it if needed
pub(crate) fn append_log(path: &Path, specs: &[OperationSpec]) -> Result<()> {
    let mut log = if path.exists() {
        load_log(path)?
    } else {
        Vec::new()
    };
    log.extend_from_slice(specs);
    std::fs::write(path, serde_json::to_string_pretty(&log)?)?;
    Ok(())
}

pub(crate) fn print_report(report: &EnqueueReport) {
    for (offset, spec) in report.applied.iter().enumerate() {
        println!(
            "  {} #{} {} ({})",
            "✓".green(),
            report.first_sequence + offset as u64,
            spec.optype().bright_white(),
            spec.member_id()
        );
    }
}
