mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    image, init, inspect, list, replay, ImageArgs, InitArgs, InspectArgs, ListArgs, ReplayArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// ODT CLI - apply collaborative editing operations to ODT documents
#[derive(Parser, Debug)]
#[command(name = "odt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and a blank document
    Init(InitArgs),

    /// Turn the paragraph at a position into a list
    List(ListArgs),

    /// Insert an image at a position
    Image(ImageArgs),

    /// Apply an operation log to a document
    Replay(ReplayArgs),

    /// Print paragraphs, lists, styles and presentation rules
    Inspect(InspectArgs),
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    // Commands that read the config report a broken one themselves
    init_tracing(&Config::load(&cwd).unwrap_or_default());

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::List(args) => list(args, &cwd),
        Command::Image(args) => image(args, &cwd),
        Command::Replay(args) => replay(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
