use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod error;
mod rpc;
mod utils;

use cmd::{CompletionArgs, E2tArgs, UenibArgs};
use error::{EXIT_ERROR, Result};

/// ONOS command line client.
///
/// Command layout:
///   onos uenib get ue <ue-id> [-a ASPECT]... [--no-headers] [-v]
///   onos uenib get ues [-a ASPECT]... [--no-headers] [-v]
///   onos uenib watch ues [-a ASPECT]... [--no-headers] [--no-replay]
///   onos {uenib|e2t} config {init|get <key>|set <key> <value>}
///   onos completion {bash|zsh|fish}
///
/// Subsystem flags (any position below the subsystem):
///   --service-address, --tls-cert-path, --tls-key-path, --tls-ca-path, --no-tls
///
/// Env:
///   ONOS_LOG                        log filter for stderr diagnostics (default: warn)
///   ONOS_<SUBSYSTEM>_SERVICE_ADDRESS service address override
#[derive(Parser, Debug)]
#[command(
    name = "onos",
    version,
    about = "ONOS command line client",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// ONOS UE-NIB subsystem commands
    Uenib(UenibArgs),

    /// ONOS e2t subsystem commands
    E2t(E2tArgs),

    /// Generate bash, zsh or fish auto-completion script
    Completion(CompletionArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    utils::init_logging();

    let runtime = match cmd::shared::runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut stdout = io::stdout().lock();
    match runtime.block_on(run(cli, &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Uenib(args) => cmd::execute_uenib(args, out).await?,
        Commands::E2t(args) => cmd::execute_e2t(&args, out)?,
        Commands::Completion(args) => cmd::execute_completion(&args, out)?,
    }
    out.flush()?;
    Ok(())
}
