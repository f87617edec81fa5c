//! Connection configuration per subsystem.
//!
//! Sources, highest precedence first:
//!   1. command line flags (`--service-address`, `--tls-*-path`, `--no-tls`)
//!   2. `ONOS_<SUBSYSTEM>_SERVICE_ADDRESS` (address only)
//!   3. `~/.onos/<subsystem>.yaml`
//!   4. the subsystem's built-in default address
//!
//! A missing config file is the same as an empty one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::Args;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Directory (under the home directory) holding per-subsystem config files.
pub const CONFIG_DIR: &str = ".onos";

/// A backend subsystem the CLI talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subsystem {
    pub name: &'static str,
    pub default_address: &'static str,
}

pub const UENIB: Subsystem = Subsystem {
    name: "uenib",
    default_address: "onos-uenib:5150",
};

pub const E2T: Subsystem = Subsystem {
    name: "e2t",
    default_address: "onos-e2t:5150",
};

impl Subsystem {
    /// Name of the environment variable overriding the service address.
    pub fn address_env_var(&self) -> String {
        format!("ONOS_{}_SERVICE_ADDRESS", self.name.to_ascii_uppercase())
    }

    pub fn address_from_env(&self) -> Option<String> {
        std::env::var(self.address_env_var())
            .ok()
            .filter(|s| !s.trim().is_empty())
    }

    /// `~/.onos/<name>.yaml`
    pub fn config_path(&self) -> Result<PathBuf> {
        let base = BaseDirs::new().ok_or_else(|| anyhow!("unable to determine home directory"))?;
        Ok(base
            .home_dir()
            .join(CONFIG_DIR)
            .join(format!("{}.yaml", self.name)))
    }
}

/// Connection flags shared by every command under a subsystem root.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Service address (host:port or http(s):// URL)
    #[arg(long = "service-address", global = true, value_name = "ADDRESS")]
    pub service_address: Option<String>,

    /// Path to the client certificate (PEM)
    #[arg(long = "tls-cert-path", global = true, value_name = "PATH")]
    pub tls_cert_path: Option<PathBuf>,

    /// Path to the client key (PEM)
    #[arg(long = "tls-key-path", global = true, value_name = "PATH")]
    pub tls_key_path: Option<PathBuf>,

    /// Path to the CA certificate used to verify the service (PEM)
    #[arg(long = "tls-ca-path", global = true, value_name = "PATH")]
    pub tls_ca_path: Option<PathBuf>,

    /// Connect without TLS (`--no-tls=false` overrides a config file)
    #[arg(
        long = "no-tls",
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub no_tls: Option<bool>,
}

/// On-disk shape of `~/.onos/<subsystem>.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_key_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_path: Option<PathBuf>,
    #[serde(default)]
    pub no_tls: bool,
}

impl ConfigFile {
    /// Read a config file; a file that does not exist yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let raw = serde_yaml::to_string(self).context("failed to serialize configuration")?;
        fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Update one key from its string form.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::ServiceAddress => self.service_address = Some(value.to_string()),
            ConfigKey::TlsCertPath => self.tls_cert_path = Some(PathBuf::from(value)),
            ConfigKey::TlsKeyPath => self.tls_key_path = Some(PathBuf::from(value)),
            ConfigKey::TlsCaPath => self.tls_ca_path = Some(PathBuf::from(value)),
            ConfigKey::NoTls => {
                self.no_tls = parse_bool(value).ok_or_else(|| {
                    CliError::Validation(format!("{key} expects true or false, got '{value}'"))
                })?
            }
        }
        Ok(())
    }
}

impl From<&ConnectionConfig> for ConfigFile {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            service_address: Some(config.service_address.clone()),
            tls_cert_path: config.tls_cert_path.clone(),
            tls_key_path: config.tls_key_path.clone(),
            tls_ca_path: config.tls_ca_path.clone(),
            no_tls: config.no_tls,
        }
    }
}

/// Fully resolved settings used to open a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub service_address: String,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
    pub tls_ca_path: Option<PathBuf>,
    pub no_tls: bool,
}

impl ConnectionConfig {
    /// Merge the sources in precedence order. Pure; see [`ConnectionConfig::load`].
    pub fn resolve(
        subsystem: Subsystem,
        args: &ConnectionArgs,
        env_address: Option<String>,
        file: ConfigFile,
    ) -> Self {
        let service_address = args
            .service_address
            .clone()
            .or(env_address)
            .or(file.service_address)
            .unwrap_or_else(|| subsystem.default_address.to_string());

        Self {
            service_address,
            tls_cert_path: args.tls_cert_path.clone().or(file.tls_cert_path),
            tls_key_path: args.tls_key_path.clone().or(file.tls_key_path),
            tls_ca_path: args.tls_ca_path.clone().or(file.tls_ca_path),
            no_tls: args.no_tls.unwrap_or(file.no_tls),
        }
    }

    /// Resolve against an environment address and the config file at `path`.
    pub fn load(
        subsystem: Subsystem,
        args: &ConnectionArgs,
        env_address: Option<String>,
        path: &Path,
    ) -> Result<Self> {
        let file = ConfigFile::load(path)?;
        Ok(Self::resolve(subsystem, args, env_address, file))
    }

    /// String form of one resolved value (empty for unset paths).
    pub fn get(&self, key: ConfigKey) -> String {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        match key {
            ConfigKey::ServiceAddress => self.service_address.clone(),
            ConfigKey::TlsCertPath => path(&self.tls_cert_path),
            ConfigKey::TlsKeyPath => path(&self.tls_key_path),
            ConfigKey::TlsCaPath => path(&self.tls_ca_path),
            ConfigKey::NoTls => self.no_tls.to_string(),
        }
    }
}

/// Keys accepted by `config get` / `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ServiceAddress,
    TlsCertPath,
    TlsKeyPath,
    TlsCaPath,
    NoTls,
}

impl ConfigKey {
    pub const fn variants() -> &'static [ConfigKey] {
        &[
            ConfigKey::ServiceAddress,
            ConfigKey::TlsCertPath,
            ConfigKey::TlsKeyPath,
            ConfigKey::TlsCaPath,
            ConfigKey::NoTls,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ServiceAddress => "service-address",
            ConfigKey::TlsCertPath => "tls-cert-path",
            ConfigKey::TlsKeyPath => "tls-key-path",
            ConfigKey::TlsCaPath => "tls-ca-path",
            ConfigKey::NoTls => "no-tls",
        }
    }

    /// Case-insensitive lookup; unknown keys are a validation error.
    pub fn parse(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase();
        Self::variants()
            .iter()
            .copied()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| {
                let known: Vec<_> = Self::variants().iter().map(|k| k.as_str()).collect();
                CliError::Validation(format!(
                    "unknown config key '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_configured() {
        let cfg = ConnectionConfig::resolve(
            UENIB,
            &ConnectionArgs::default(),
            None,
            ConfigFile::default(),
        );
        assert_eq!(cfg.service_address, "onos-uenib:5150");
        assert!(!cfg.no_tls);
        assert!(cfg.tls_cert_path.is_none());
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = ConfigFile {
            service_address: Some("from-file:1".into()),
            ..Default::default()
        };
        let env = Some("from-env:2".to_string());

        let cfg = ConnectionConfig::resolve(E2T, &ConnectionArgs::default(), None, file.clone());
        assert_eq!(cfg.service_address, "from-file:1");

        let cfg =
            ConnectionConfig::resolve(E2T, &ConnectionArgs::default(), env.clone(), file.clone());
        assert_eq!(cfg.service_address, "from-env:2");

        let args = ConnectionArgs {
            service_address: Some("from-flag:3".into()),
            ..Default::default()
        };
        let cfg = ConnectionConfig::resolve(E2T, &args, env, file);
        assert_eq!(cfg.service_address, "from-flag:3");
    }

    #[test]
    fn no_tls_flag_overrides_file_both_ways() {
        let file = ConfigFile {
            no_tls: true,
            ..Default::default()
        };
        let cfg = ConnectionConfig::resolve(UENIB, &ConnectionArgs::default(), None, file.clone());
        assert!(cfg.no_tls);

        let args = ConnectionArgs {
            no_tls: Some(false),
            ..Default::default()
        };
        let cfg = ConnectionConfig::resolve(UENIB, &args, None, file);
        assert!(!cfg.no_tls);

        let args = ConnectionArgs {
            no_tls: Some(true),
            ..Default::default()
        };
        let cfg = ConnectionConfig::resolve(UENIB, &args, None, ConfigFile::default());
        assert!(cfg.no_tls);
    }

    #[test]
    fn env_var_name_is_per_subsystem() {
        assert_eq!(UENIB.address_env_var(), "ONOS_UENIB_SERVICE_ADDRESS");
        assert_eq!(E2T.address_env_var(), "ONOS_E2T_SERVICE_ADDRESS");
    }

    #[test]
    fn config_key_parse() {
        assert_eq!(
            ConfigKey::parse("Service-Address").unwrap(),
            ConfigKey::ServiceAddress
        );
        let err = ConfigKey::parse("colour").unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("service-address"));
    }

    #[test]
    fn set_no_tls_rejects_garbage() {
        let mut file = ConfigFile::default();
        file.set(ConfigKey::NoTls, "yes").unwrap();
        assert!(file.no_tls);
        assert!(file.set(ConfigKey::NoTls, "maybe").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ConfigFile::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("uenib.yaml");
        let mut file = ConfigFile::default();
        file.set(ConfigKey::ServiceAddress, "localhost:5150").unwrap();
        file.set(ConfigKey::TlsCaPath, "/etc/onos/ca.crt").unwrap();
        file.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("service-address: localhost:5150"), "{raw}");

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, file);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uenib.yaml");
        fs::write(&path, "service-address: [unterminated").unwrap();
        let err = ConfigFile::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }
}
