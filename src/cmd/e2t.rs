//! `onos e2t ...`: E2 termination subsystem.
//!
//! Only connection configuration lives here for now; the root carries the
//! same connection flags as every other subsystem, defaulting to `onos-e2t:5150`.

use std::io::Write;

use clap::{Args, Subcommand};

use crate::cmd::config::{ConfigCommands, execute_config};
use crate::config::{ConnectionArgs, E2T};
use crate::error::Result;

/// CLI arguments for `onos e2t`
#[derive(Args, Debug)]
pub struct E2tArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: E2tCommands,
}

#[derive(Subcommand, Debug)]
pub enum E2tCommands {
    /// Manage the CLI configuration for the E2T
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Entry point for `onos e2t`.
pub fn execute_e2t(args: &E2tArgs, out: &mut impl Write) -> Result<()> {
    match &args.command {
        E2tCommands::Config { command } => execute_config(command, E2T, &args.connection, out),
    }
}
