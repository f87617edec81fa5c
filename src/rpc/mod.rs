//! Backend connections.
//!
//! parse_address -> Url (the gRPC endpoint for a configured service address)
//! establish     -> Connection (scoped channel; closed when dropped)
//!
//! Service clients live in submodules (`uenib`).

pub mod uenib;

use std::fmt;
use std::time::Duration;

use anyhow::{Context, anyhow};
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tracing::debug;
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::{CliError, Result};

/// Upper bound on establishing the channel.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Turn a configured service address into an endpoint URL.
///
/// Parsing Strategy:
/// 1. `http://` / `https://` URLs are used as-is.
/// 2. Anything else containing `://` has an unsupported scheme.
/// 3. Otherwise the value is `host:port` and gets `https://` when TLS is on,
///    `http://` when it is off.
///
/// Examples:
/// - "onos-uenib:5150"          -> http://onos-uenib:5150/
/// - "https://uenib.local:5150" -> https://uenib.local:5150/
pub fn parse_address(raw: &str, tls: bool) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("service address is empty").into());
    }

    let url = if trimmed.contains("://") {
        let url = Url::parse(trimmed).with_context(|| format!("invalid service address '{raw}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "unsupported scheme '{}' in service address '{raw}'",
                url.scheme()
            )
            .into());
        }
        url
    } else {
        let scheme = if tls { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{trimmed}"))
            .with_context(|| format!("invalid service address '{raw}'"))?
    };

    if url.host_str().is_none_or(str::is_empty) {
        return Err(anyhow!("service address '{raw}' has no host").into());
    }
    Ok(url)
}

/// Build the TLS settings, or `None` for a plaintext channel.
///
/// TLS is on unless `no-tls` is set, and only when there is something to
/// present or verify with. A CA alone verifies the service; a cert/key pair
/// additionally needs the CA, since no system roots are loaded.
pub fn tls_config(config: &ConnectionConfig) -> Result<Option<ClientTlsConfig>> {
    if config.no_tls {
        return Ok(None);
    }

    let identity_paths = match (&config.tls_cert_path, &config.tls_key_path) {
        (Some(cert), Some(key)) => Some((cert, key)),
        (None, None) => None,
        _ => {
            return Err(anyhow!("tls-cert-path and tls-key-path must be set together").into());
        }
    };

    let Some(ca_path) = &config.tls_ca_path else {
        if identity_paths.is_some() {
            return Err(anyhow!(
                "tls-ca-path is required with a client certificate to verify the service"
            )
            .into());
        }
        return Ok(None);
    };

    let ca = std::fs::read(ca_path)
        .with_context(|| format!("failed to read CA certificate {}", ca_path.display()))?;
    let mut tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(ca));

    if let Some((cert, key)) = identity_paths {
        let cert = std::fs::read(cert)
            .with_context(|| format!("failed to read TLS certificate {}", cert.display()))?;
        let key = std::fs::read(key)
            .with_context(|| format!("failed to read TLS key {}", key.display()))?;
        tls = tls.identity(Identity::from_pem(cert, key));
    }
    Ok(Some(tls))
}

/// A live channel to one backend service.
///
/// Owned by the command that opened it; dropping it on any exit path
/// releases the channel.
pub struct Connection {
    channel: Channel,
    target: Url,
}

impl Connection {
    /// Handle for building service clients. Clones share the underlying channel.
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Plaintext connection that never dials until first used.
    #[cfg(test)]
    pub(crate) fn lazy(address: &str) -> Result<Self> {
        let target = parse_address(address, false)?;
        let channel = Endpoint::from_shared(target.to_string())
            .map_err(|e| CliError::Connection(format!("{target}: {e}")))?
            .connect_lazy();
        Ok(Self { channel, target })
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("target", &self.target.as_str())
            .finish_non_exhaustive()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!(address = %self.target, "closing connection");
    }
}

/// Open a channel to the configured service.
pub async fn establish(config: &ConnectionConfig) -> Result<Connection> {
    let tls = tls_config(config)?;
    let target = parse_address(&config.service_address, tls.is_some())?;

    let mut endpoint = Endpoint::from_shared(target.to_string())
        .map_err(|e| CliError::Connection(format!("{target}: {e}")))?
        .connect_timeout(CONNECT_TIMEOUT);
    if let Some(tls) = tls {
        endpoint = endpoint
            .tls_config(tls)
            .map_err(|e| CliError::Connection(format!("{target}: {e}")))?;
    }

    debug!(address = %target, "connecting");
    let channel = endpoint
        .connect()
        .await
        .map_err(|e| CliError::Connection(format!("{target}: {e}")))?;
    debug!(address = %target, "connected");

    Ok(Connection { channel, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::capture_logs;
    use std::path::PathBuf;

    fn config(address: &str) -> ConnectionConfig {
        ConnectionConfig {
            service_address: address.to_string(),
            tls_cert_path: None,
            tls_key_path: None,
            tls_ca_path: None,
            no_tls: false,
        }
    }

    #[test]
    fn host_port_gets_scheme_from_tls() {
        let url = parse_address("onos-uenib:5150", false).unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("onos-uenib"));
        assert_eq!(url.port(), Some(5150));

        let url = parse_address("onos-uenib:5150", true).unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn ip_address_without_scheme() {
        let url = parse_address("127.0.0.1:5150", false).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5150/");
    }

    #[test]
    fn explicit_url_kept() {
        let url = parse_address("https://uenib.example:443", false).unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn unsupported_scheme_rejected() {
        let err = parse_address("ws://uenib:5150", false).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"), "{err}");
    }

    #[test]
    fn empty_address_rejected() {
        let err = parse_address("   ", false).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn plaintext_without_tls_material() {
        assert!(tls_config(&config("uenib:5150")).unwrap().is_none());
    }

    #[test]
    fn no_tls_wins_over_paths() {
        let mut cfg = config("uenib:5150");
        cfg.tls_ca_path = Some(PathBuf::from("/does/not/exist.pem"));
        cfg.no_tls = true;
        assert!(tls_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn cert_without_key_rejected() {
        let mut cfg = config("uenib:5150");
        cfg.tls_cert_path = Some(PathBuf::from("client.crt"));
        let err = tls_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("must be set together"), "{err}");
    }

    #[test]
    fn unreadable_ca_is_config_error() {
        let mut cfg = config("uenib:5150");
        cfg.tls_ca_path = Some(PathBuf::from("/does/not/exist.pem"));
        let err = tls_config(&cfg).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    fn write_pem(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "-----BEGIN CERTIFICATE-----\n-----END CERTIFICATE-----\n")
            .unwrap();
        path
    }

    #[test]
    fn client_identity_without_ca_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config("uenib:5150");
        cfg.tls_cert_path = Some(write_pem(dir.path(), "client.crt"));
        cfg.tls_key_path = Some(write_pem(dir.path(), "client.key"));

        let err = tls_config(&cfg).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("tls-ca-path"), "{err}");
    }

    #[test]
    fn client_identity_with_ca_enables_tls() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config("uenib:5150");
        cfg.tls_cert_path = Some(write_pem(dir.path(), "client.crt"));
        cfg.tls_key_path = Some(write_pem(dir.path(), "client.key"));
        cfg.tls_ca_path = Some(write_pem(dir.path(), "ca.crt"));
        assert!(tls_config(&cfg).unwrap().is_some());
    }

    #[test]
    fn ca_alone_enables_tls() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config("uenib:5150");
        cfg.tls_ca_path = Some(write_pem(dir.path(), "ca.crt"));
        assert!(tls_config(&cfg).unwrap().is_some());
    }

    #[tokio::test]
    async fn dropping_connection_logs_release() {
        let (logs, _guard) = capture_logs();
        let conn = Connection::lazy("127.0.0.1:1").unwrap();
        assert_eq!(conn.target().as_str(), "http://127.0.0.1:1/");
        assert!(!logs.contents().contains("closing connection"));

        drop(conn);
        assert!(logs.contents().contains("closing connection"));
    }

    #[tokio::test]
    async fn establish_unreachable_is_connection_error() {
        // Port 1 on loopback refuses immediately.
        let err = establish(&config("127.0.0.1:1")).await.unwrap_err();
        assert!(matches!(err, CliError::Connection(_)), "{err}");
    }
}
