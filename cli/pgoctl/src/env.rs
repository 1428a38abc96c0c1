//! Environment variable names and the lookup seam used to read them.
//!
//! Credential and channel resolution read the environment through
//! [`EnvSource`] so tests can supply a map instead of touching the process
//! environment.

use std::collections::HashMap;

pub const PGOUSERNAME: &str = "PGOUSERNAME";
pub const PGOUSERPASS: &str = "PGOUSERPASS";
pub const PGOUSER: &str = "PGOUSER";
pub const PGO_CA_CERT: &str = "PGO_CA_CERT";
pub const PGO_CLIENT_CERT: &str = "PGO_CLIENT_CERT";
pub const PGO_CLIENT_KEY: &str = "PGO_CLIENT_KEY";
pub const PGO_NAMESPACE: &str = "PGO_NAMESPACE";
pub const PGO_APISERVER_URL: &str = "PGO_APISERVER_URL";
pub const PGO_DISABLE_TLS_HOSTNAME_VERIFICATION: &str = "PGO_DISABLE_TLS_HOSTNAME_VERIFICATION";

/// Read-only view of environment variables.
///
/// An empty value reads the same as an unset one.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;

    /// `true` for `1`, `true` or `yes` (any case).
    fn flag(&self, key: &str) -> bool {
        self.var(key)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty()).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_reads_as_unset() {
        let env = HashMap::from([(PGOUSERNAME, ""), (PGOUSERPASS, "secret")]);
        assert_eq!(env.var(PGOUSERNAME), None);
        assert_eq!(env.var(PGOUSERPASS).as_deref(), Some("secret"));
    }

    #[test]
    fn flag_accepts_common_truthy_spellings() {
        let env = HashMap::from([("A", "TRUE"), ("B", "1"), ("C", "no")]);
        assert!(env.flag("A"));
        assert!(env.flag("B"));
        assert!(!env.flag("C"));
        assert!(!env.flag("D"));
    }
}
