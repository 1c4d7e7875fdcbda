use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kurs::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for kurs::AppCommand {
    fn from(cmd: Commands) -> kurs::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => kurs::AppCommand::Convert { amount, from, to },
            Commands::Rates { base } => kurs::AppCommand::Rates { base },
            Commands::Currencies => kurs::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: Option<String>,

        /// Source currency code
        #[arg(short, long)]
        from: Option<String>,

        /// Target currency code
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Display exchange rates for a base currency
    Rates {
        /// Base currency code
        #[arg(short, long)]
        base: Option<String>,
    },
    /// List known currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kurs::cli::setup::setup(),
        Some(cmd) => kurs::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
