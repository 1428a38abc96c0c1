//! Mutual-TLS transport to the API server.
//!
//! The channel trusts only the CA bundle it is given, presents the client
//! certificate on every handshake, and refuses anything below TLS 1.2.
//! Building it reads and validates all three PEM files up front, so a bad
//! path or a malformed file fails before any request is attempted.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use reqwest::tls::Version;
use reqwest::{Certificate, Client, Identity};
use tracing::{debug, warn};

use crate::env::{EnvSource, PGO_CA_CERT, PGO_CLIENT_CERT, PGO_CLIENT_KEY};
use crate::error::SetupError;

/// Paths to the CA bundle and the client certificate and key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPaths {
    pub ca_cert: PathBuf,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
}

impl ChannelPaths {
    /// Each path comes from its flag if given, else its environment
    /// variable. A path with neither is fatal.
    pub fn resolve(
        ca_cert: Option<PathBuf>,
        client_cert: Option<PathBuf>,
        client_key: Option<PathBuf>,
        env: &dyn EnvSource,
    ) -> Result<Self, SetupError> {
        Ok(Self {
            ca_cert: pick(ca_cert, env, "CA certificate", "pgo-ca-cert", PGO_CA_CERT)?,
            client_cert: pick(
                client_cert,
                env,
                "client certificate",
                "pgo-client-cert",
                PGO_CLIENT_CERT,
            )?,
            client_key: pick(
                client_key,
                env,
                "client key",
                "pgo-client-key",
                PGO_CLIENT_KEY,
            )?,
        })
    }
}

fn pick(
    flag_value: Option<PathBuf>,
    env: &dyn EnvSource,
    what: &'static str,
    flag: &'static str,
    env_key: &'static str,
) -> Result<PathBuf, SetupError> {
    flag_value
        .filter(|path| !path.as_os_str().is_empty())
        .or_else(|| env.var(env_key).map(PathBuf::from))
        .ok_or(SetupError::MissingTlsPath {
            what,
            flag,
            env: env_key,
        })
}

/// Parsed trust anchors and client identity, ready to hand to the client
/// builder.
pub struct CertificateMaterial {
    roots: Vec<Certificate>,
    identity: Identity,
}

impl CertificateMaterial {
    pub fn load(paths: &ChannelPaths) -> Result<Self, SetupError> {
        let ca_pem = read(&paths.ca_cert, "CA certificate")?;
        let ca_ders = parse_certs(&paths.ca_cert, &ca_pem)?;
        let roots = ca_ders
            .iter()
            .map(|der| Certificate::from_der(der))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SetupError::InvalidTlsMaterial)?;

        let cert_pem = read(&paths.client_cert, "client certificate")?;
        parse_certs(&paths.client_cert, &cert_pem)?;

        let key_pem = read(&paths.client_key, "client key")?;
        let has_key = rustls_pemfile::private_key(&mut BufReader::new(key_pem.as_slice()))
            .map_err(|source| SetupError::InvalidPem {
                path: paths.client_key.clone(),
                source,
            })?
            .is_some();
        if !has_key {
            return Err(SetupError::NoPrivateKey {
                path: paths.client_key.clone(),
            });
        }

        let mut identity_pem = cert_pem;
        if !identity_pem.ends_with(b"\n") {
            identity_pem.push(b'\n');
        }
        identity_pem.extend_from_slice(&key_pem);
        let identity =
            Identity::from_pem(&identity_pem).map_err(SetupError::InvalidTlsMaterial)?;

        debug!(
            ca_cert = %paths.ca_cert.display(),
            client_cert = %paths.client_cert.display(),
            client_key = %paths.client_key.display(),
            roots = roots.len(),
            "loaded TLS material"
        );

        Ok(Self { roots, identity })
    }
}

fn read(path: &Path, what: &'static str) -> Result<Vec<u8>, SetupError> {
    fs::read(path).map_err(|source| SetupError::TlsFileUnreadable {
        what,
        path: path.to_path_buf(),
        source,
    })
}

fn parse_certs(path: &Path, pem: &[u8]) -> Result<Vec<Vec<u8>>, SetupError> {
    let ders = rustls_pemfile::certs(&mut BufReader::new(pem))
        .map(|cert| cert.map(|der| der.to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SetupError::InvalidPem {
            path: path.to_path_buf(),
            source,
        })?;
    if ders.is_empty() {
        return Err(SetupError::NoCertificates {
            path: path.to_path_buf(),
        });
    }
    Ok(ders)
}

/// Builds the one [`SecureChannel`] a process uses.
#[derive(Debug, Clone)]
pub struct SecureChannelBuilder {
    paths: ChannelPaths,
    verify_hostname: bool,
}

impl SecureChannelBuilder {
    pub fn new(paths: ChannelPaths) -> Self {
        Self {
            paths,
            verify_hostname: true,
        }
    }

    /// Whether the server certificate must name the host being dialed.
    /// The chain is always checked against the CA bundle either way.
    #[must_use]
    pub fn verify_hostname(mut self, verify: bool) -> Self {
        self.verify_hostname = verify;
        self
    }

    pub fn build(self) -> Result<SecureChannel, SetupError> {
        let material = CertificateMaterial::load(&self.paths)?;

        if !self.verify_hostname {
            warn!("TLS hostname verification is disabled; the server certificate is checked against the CA only");
        }

        let mut builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .min_tls_version(Version::TLS_1_2)
            .identity(material.identity)
            .danger_accept_invalid_hostnames(!self.verify_hostname)
            .https_only(true);
        for root in material.roots {
            builder = builder.add_root_certificate(root);
        }

        let client = builder.build().map_err(SetupError::ClientBuild)?;
        Ok(SecureChannel { client })
    }
}

/// Reusable HTTPS transport. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SecureChannel {
    client: Client,
}

impl SecureChannel {
    /// Wrap an already configured client, e.g. a plain-HTTP one for tests
    /// against a local mock server.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn flag_wins_over_env() {
        let env = HashMap::from([
            (PGO_CA_CERT, "/env/ca.crt"),
            (PGO_CLIENT_CERT, "/env/client.crt"),
            (PGO_CLIENT_KEY, "/env/client.key"),
        ]);
        let paths =
            ChannelPaths::resolve(Some(PathBuf::from("/flag/ca.crt")), None, None, &env).unwrap();

        assert_eq!(paths.ca_cert, PathBuf::from("/flag/ca.crt"));
        assert_eq!(paths.client_cert, PathBuf::from("/env/client.crt"));
        assert_eq!(paths.client_key, PathBuf::from("/env/client.key"));
    }

    #[test]
    fn missing_key_path_is_fatal() {
        let env = HashMap::from([(PGO_CA_CERT, "/ca.crt"), (PGO_CLIENT_CERT, "/client.crt")]);
        let err = ChannelPaths::resolve(None, None, None, &env).unwrap_err();

        assert!(matches!(
            err,
            SetupError::MissingTlsPath {
                env: PGO_CLIENT_KEY,
                ..
            }
        ));
    }

    #[test]
    fn unreadable_ca_is_reported_with_its_path() {
        let paths = ChannelPaths {
            ca_cert: PathBuf::from("/nonexistent/pgo/ca.crt"),
            client_cert: PathBuf::from("/nonexistent/pgo/client.crt"),
            client_key: PathBuf::from("/nonexistent/pgo/client.key"),
        };
        let err = CertificateMaterial::load(&paths).err().unwrap();

        assert!(matches!(
            err,
            SetupError::TlsFileUnreadable { what: "CA certificate", .. }
        ));
    }

    #[test]
    fn pem_without_certificates_is_rejected() {
        let err = parse_certs(Path::new("ca.crt"), b"not a pem file\n").unwrap_err();
        assert!(matches!(err, SetupError::NoCertificates { .. }));
    }
}
