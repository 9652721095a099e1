use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxdash::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Increase logging detail (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Render the dashboard page
    Render {
        /// Where to write the HTML page
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any currency cannot be loaded
        #[arg(long)]
        strict: bool,
    },
    /// Display rates and buying power in the terminal
    Summary {
        /// Fail if any currency cannot be loaded
        #[arg(long)]
        strict: bool,
    },
}

impl From<Commands> for fxdash::AppCommand {
    fn from(cmd: Commands) -> fxdash::AppCommand {
        match cmd {
            Commands::Render { output, strict } => fxdash::AppCommand::Render { output, strict },
            Commands::Summary { strict } => fxdash::AppCommand::Summary { strict },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fxdash::cli::setup::setup_at_path(path),
            None => fxdash::cli::setup::setup(),
        },
        Some(cmd) => fxdash::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
