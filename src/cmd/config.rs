/*!
`config.rs`

`onos <subsystem> config {init|get|set}`: inspect and edit
`~/.onos/<subsystem>.yaml`.

  - init           : write the currently resolved settings; refuses to overwrite
  - get <key>      : print one resolved value (flags and env included)
  - set <key> <v>  : update one key in the file, creating it if needed
*/

use std::io::Write;
use std::path::Path;

use anyhow::anyhow;
use clap::Subcommand;
use tracing::info;

use crate::config::{ConfigFile, ConfigKey, ConnectionArgs, ConnectionConfig, Subsystem};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the current settings
    Init,

    /// Print a config value
    Get {
        /// service-address | tls-cert-path | tls-key-path | tls-ca-path | no-tls
        key: String,
    },

    /// Set a config value in the config file
    Set {
        /// service-address | tls-cert-path | tls-key-path | tls-ca-path | no-tls
        key: String,
        value: String,
    },
}

/// Entry point: resolves the subsystem's config path and environment.
pub fn execute_config(
    command: &ConfigCommands,
    subsystem: Subsystem,
    args: &ConnectionArgs,
    out: &mut impl Write,
) -> Result<()> {
    let path = subsystem.config_path()?;
    run_config(
        command,
        subsystem,
        args,
        subsystem.address_from_env(),
        &path,
        out,
    )
}

pub(crate) fn run_config(
    command: &ConfigCommands,
    subsystem: Subsystem,
    args: &ConnectionArgs,
    env_address: Option<String>,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let file = ConfigFile::load(path)?;
    match command {
        ConfigCommands::Init => {
            if path.exists() {
                return Err(anyhow!("config file {} already exists", path.display()).into());
            }
            let resolved = ConnectionConfig::resolve(subsystem, args, env_address, file);
            ConfigFile::from(&resolved).save(path)?;
            info!(path = %path.display(), "config initialized");
            writeln!(out, "{}", path.display())?;
        }
        ConfigCommands::Get { key } => {
            let key = ConfigKey::parse(key)?;
            let resolved = ConnectionConfig::resolve(subsystem, args, env_address, file);
            writeln!(out, "{}", resolved.get(key))?;
        }
        ConfigCommands::Set { key, value } => {
            let key = ConfigKey::parse(key)?;
            let mut file = file;
            file.set(key, value)?;
            file.save(path)?;
            info!(path = %path.display(), %key, "config updated");
        }
    }
    Ok(())
}
