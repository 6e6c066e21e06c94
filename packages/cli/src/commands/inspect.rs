use anyhow::Result;
use clap::Args;
use colored::Colorize;
use odt_document::visitor::{walk_children, walk_node};
use odt_document::{Document, Frame, NodeId, StyleFamily, Visitor};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Document file
    pub document: PathBuf,

    /// Also print the generated presentation rules
    #[arg(long)]
    pub css: bool,
}

pub fn inspect(args: InspectArgs, _cwd: &str) -> Result<()> {
    let doc = Document::load(&args.document)?;

    println!("{}", "Content".bright_blue().bold());
    let mut printer = TreePrinter::default();
    printer.visit_node(&doc, doc.root());
    for line in printer.lines {
        println!("  {}", line);
    }
    println!("  length: {}", doc.length());

    println!();
    println!("{}", "Styles".bright_blue().bold());
    for family in [StyleFamily::Paragraph, StyleFamily::Graphic, StyleFamily::List] {
        for style in doc.query_style_definitions(family) {
            let container = if doc.automatic_styles().contains(&style.name, family) {
                "automatic"
            } else {
                "common"
            };
            let kind = style
                .list_level_kind()
                .map(|kind| format!(" ({})", kind))
                .unwrap_or_default();
            println!(
                "  {} {}{} [{}]",
                family.to_string().dimmed(),
                style.name.bright_white(),
                kind,
                container
            );
        }
    }

    let blobs: Vec<_> = doc.blob_names().collect();
    if !blobs.is_empty() {
        println!();
        println!("{}", "Blobs".bright_blue().bold());
        for name in blobs {
            println!("  {}", name);
        }
    }

    let cursors: Vec<_> = doc.cursors().collect();
    if !cursors.is_empty() {
        println!();
        println!("{}", "Cursors".bright_blue().bold());
        for (member, cursor) in cursors {
            println!(
                "  {} @ {} (+{})",
                member.bright_white(),
                cursor.position,
                cursor.length
            );
        }
    }

    if args.css {
        println!();
        println!("{}", "Presentation rules".bright_blue().bold());
        print!("{}", doc.stylesheet().to_css());
    }

    Ok(())
}

/// Renders the content tree as indented lines
#[derive(Debug, Default)]
struct TreePrinter {
    depth: usize,
    lines: Vec<String>,
}

impl TreePrinter {
    fn push(&mut self, line: String) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), line));
    }

    fn nested(&mut self, doc: &Document, id: NodeId) {
        self.depth += 1;
        walk_children(self, doc, id);
        self.depth -= 1;
    }
}

impl Visitor for TreePrinter {
    fn visit_node(&mut self, doc: &Document, id: NodeId) {
        if let Some(kind) = doc.kind(id) {
            if matches!(kind, odt_document::NodeKind::Body | odt_document::NodeKind::ListItem) {
                self.push(kind.element_name().to_string());
                self.nested(doc, id);
                return;
            }
        }
        walk_node(self, doc, id);
    }

    fn visit_paragraph(&mut self, doc: &Document, id: NodeId) {
        let start = doc.paragraph_start(id).unwrap_or(0);
        let end = start + doc.paragraph_len(id);
        self.push(format!(
            "text:p [{}..{}] {:?}",
            start,
            end,
            doc.paragraph_text(id)
        ));
        self.nested(doc, id);
    }

    fn visit_list(
        &mut self,
        doc: &Document,
        id: NodeId,
        style_name: &str,
        counter_id: Option<&str>,
    ) {
        self.push(format!(
            "text:list {} {}",
            style_name,
            counter_id.unwrap_or("-")
        ));
        self.nested(doc, id);
    }

    fn visit_frame(&mut self, _doc: &Document, _id: NodeId, frame: &Frame) {
        self.push(format!(
            "draw:frame {} {}x{} -> {}",
            frame.name, frame.width, frame.height, frame.href
        ));
    }
}
