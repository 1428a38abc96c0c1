//! The per-process session: resolved identity plus the shared channel.
//!
//! A [`Session`] is built once, before any command logic runs, and is only
//! read afterwards. Every call borrows it.

use std::path::PathBuf;

use reqwest::Url;
use tracing::debug;

use crate::channel::{ChannelPaths, SecureChannel, SecureChannelBuilder};
use crate::credentials::{CredentialStore, Credentials};
use crate::env::{EnvSource, PGO_APISERVER_URL, PGO_DISABLE_TLS_HOSTNAME_VERIFICATION};
use crate::error::SetupError;

/// Connection settings supplied on the command line. Anything left unset
/// falls back to the environment.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub apiserver_url: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub disable_hostname_verification: bool,
}

impl SessionOptions {
    /// Flag, then `PGO_APISERVER_URL`, then the saved config value.
    pub fn resolve_server_url(
        &self,
        env: &dyn EnvSource,
        saved: Option<&str>,
    ) -> Result<String, SetupError> {
        let raw = self
            .apiserver_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| env.var(PGO_APISERVER_URL))
            .or_else(|| saved.map(str::to_string).filter(|url| !url.trim().is_empty()))
            .ok_or(SetupError::MissingServerUrl)?;
        normalize_server_url(&raw)
    }

    pub fn verify_hostname(&self, env: &dyn EnvSource) -> bool {
        !(self.disable_hostname_verification || env.flag(PGO_DISABLE_TLS_HOSTNAME_VERIFICATION))
    }
}

/// Trim whitespace and trailing slashes, and require an absolute https URL
/// with a host. Plain http is never dialed.
pub fn normalize_server_url(raw: &str) -> Result<String, SetupError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| SetupError::InvalidServerUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    if url.scheme() != "https" {
        return Err(SetupError::InvalidServerUrl {
            url: raw.to_string(),
            reason: format!("scheme {} is not https", url.scheme()),
        });
    }
    if url.host_str().is_none() {
        return Err(SetupError::InvalidServerUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

/// Resolved credentials bound to the one transport used for every call.
#[derive(Debug, Clone)]
pub struct Session {
    credentials: Credentials,
    channel: SecureChannel,
    base_url: String,
}

impl Session {
    pub fn new(credentials: Credentials, channel: SecureChannel) -> Self {
        let base_url = credentials.server_url.trim_end_matches('/').to_string();
        Self {
            credentials,
            channel,
            base_url,
        }
    }

    /// Resolve the server URL, credentials and TLS material, in that order,
    /// and build the channel. Fails before any network activity.
    pub fn establish(
        options: &SessionOptions,
        env: &dyn EnvSource,
        saved_server_url: Option<&str>,
    ) -> Result<Self, SetupError> {
        Self::establish_with(options, env, saved_server_url, CredentialStore::from_env(env))
    }

    /// [`establish`](Self::establish) with an explicit credential store.
    pub fn establish_with(
        options: &SessionOptions,
        env: &dyn EnvSource,
        saved_server_url: Option<&str>,
        store: CredentialStore,
    ) -> Result<Self, SetupError> {
        let server_url = options.resolve_server_url(env, saved_server_url)?;
        let credentials = store.resolve(&server_url)?;

        let paths = ChannelPaths::resolve(
            options.ca_cert.clone(),
            options.client_cert.clone(),
            options.client_key.clone(),
            env,
        )?;
        let channel = SecureChannelBuilder::new(paths)
            .verify_hostname(options.verify_hostname(env))
            .build()?;

        debug!(server_url = %server_url, "session established");
        Ok(Self::new(credentials, channel))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn channel(&self) -> &SecureChannel {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn server_url_precedence() {
        let env = HashMap::from([(PGO_APISERVER_URL, "https://env:8443")]);
        let empty: HashMap<&str, &str> = HashMap::new();

        let flag = SessionOptions {
            apiserver_url: Some("https://flag:8443/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            flag.resolve_server_url(&env, Some("https://saved:8443")).unwrap(),
            "https://flag:8443"
        );

        let none = SessionOptions::default();
        assert_eq!(
            none.resolve_server_url(&env, Some("https://saved:8443")).unwrap(),
            "https://env:8443"
        );
        assert_eq!(
            none.resolve_server_url(&empty, Some("https://saved:8443")).unwrap(),
            "https://saved:8443"
        );
        assert!(matches!(
            none.resolve_server_url(&empty, None),
            Err(SetupError::MissingServerUrl)
        ));
    }

    #[test]
    fn rejects_relative_or_odd_urls() {
        assert!(normalize_server_url("pgo-apiserver:8443").is_err());
        assert!(normalize_server_url("ftp://pgo:21").is_err());
        assert!(matches!(
            normalize_server_url("http://pgo:8443"),
            Err(SetupError::InvalidServerUrl { .. })
        ));
        assert_eq!(
            normalize_server_url(" https://pgo:8443// ").unwrap(),
            "https://pgo:8443"
        );
    }

    #[test]
    fn hostname_verification_defaults_on() {
        let empty: HashMap<&str, &str> = HashMap::new();
        let env = HashMap::from([(PGO_DISABLE_TLS_HOSTNAME_VERIFICATION, "true")]);

        assert!(SessionOptions::default().verify_hostname(&empty));
        assert!(!SessionOptions::default().verify_hostname(&env));
        let flagged = SessionOptions {
            disable_hostname_verification: true,
            ..Default::default()
        };
        assert!(!flagged.verify_hostname(&empty));
    }
}
