//! LazyQR - styled QR code generator
//!
//! Formats content into QR payloads, renders them with the saved style and
//! manages that style from the command line.

use clap::{Parser, Subcommand};

use lazyqr::cli::{CliResult, ConfigArgs, FormatArgs, RenderArgs};
use lazyqr::logging;

/// LazyQR - styled QR code generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the encoded payload for some content
    Format(FormatArgs),
    /// Render a styled QR code to an image file
    Render(RenderArgs),
    /// Manage the saved style configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Command::Format(args) => args.execute(),
            Command::Render(args) => args.execute(),
            Command::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {}", e.message);
        std::process::exit(e.code.code());
    }
}
