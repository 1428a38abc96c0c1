//! Basic-auth identity resolution.
//!
//! Sources are tried in a fixed order and the first one that yields a
//! username and password wins:
//!
//! 1. `PGOUSERNAME` + `PGOUSERPASS`
//! 2. the file named by `PGOUSER`
//! 3. `~/.pgouser`
//! 4. `/etc/pgo/pgouser`
//!
//! Nothing is merged across sources. A half-set environment pair, an
//! unreadable `PGOUSER` file, or a present but malformed file stops the
//! search instead of falling through.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;
use tracing::debug;

use crate::env::{EnvSource, PGOUSER, PGOUSERNAME, PGOUSERPASS};
use crate::error::SetupError;

/// Dotfile looked up in the home directory.
pub const USER_FILE_NAME: &str = ".pgouser";

/// System-wide fallback credentials file.
pub const SYSTEM_USER_FILE: &str = "/etc/pgo/pgouser";

/// Identity sent with every call, plus the API server it is for.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub server_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server_url", &self.server_url)
            .finish()
    }
}

/// Where a resolved identity came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    UserFile(PathBuf),
    HomeFile(PathBuf),
    SystemFile(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "{PGOUSERNAME}/{PGOUSERPASS}"),
            Self::UserFile(path) => write!(f, "{PGOUSER}={}", path.display()),
            Self::HomeFile(path) | Self::SystemFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Why a credentials file line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialParseError {
    #[error("file is empty")]
    Empty,

    #[error("expected one line, found {0}")]
    MultipleLines(usize),

    #[error("expected username:password")]
    MissingSeparator,

    #[error("username is empty")]
    EmptyUsername,

    #[error("password is empty")]
    EmptyPassword,
}

/// Parse `username:password`, splitting on the first colon.
///
/// Only the line as a whole is trimmed; whitespace inside either half is
/// part of the credential.
pub fn parse_credentials(contents: &str) -> Result<(String, String), CredentialParseError> {
    let lines: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let line = match lines.as_slice() {
        [] => return Err(CredentialParseError::Empty),
        [line] => *line,
        many => return Err(CredentialParseError::MultipleLines(many.len())),
    };

    let (username, password) = line
        .split_once(':')
        .ok_or(CredentialParseError::MissingSeparator)?;

    if username.is_empty() {
        return Err(CredentialParseError::EmptyUsername);
    }
    if password.is_empty() {
        return Err(CredentialParseError::EmptyPassword);
    }

    Ok((username.to_string(), password.to_string()))
}

/// Snapshot of every credential source, taken once at startup.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    env_username: Option<String>,
    env_password: Option<String>,
    user_file: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    system_file: PathBuf,
}

impl CredentialStore {
    /// Read the environment and locate the home directory.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            env_username: env.var(PGOUSERNAME),
            env_password: env.var(PGOUSERPASS),
            user_file: env.var(PGOUSER).map(PathBuf::from),
            home_dir: BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
            system_file: PathBuf::from(SYSTEM_USER_FILE),
        }
    }

    #[must_use]
    pub fn with_home_dir(mut self, home_dir: Option<PathBuf>) -> Self {
        self.home_dir = home_dir;
        self
    }

    #[must_use]
    pub fn with_system_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_file = path.into();
        self
    }

    pub fn resolve(&self, server_url: &str) -> Result<Credentials, SetupError> {
        self.resolve_with_source(server_url)
            .map(|(credentials, _)| credentials)
    }

    pub fn resolve_with_source(
        &self,
        server_url: &str,
    ) -> Result<(Credentials, CredentialSource), SetupError> {
        let (username, password, source) = self.lookup()?;
        debug!(source = %source, username = %username, "resolved credentials");

        Ok((
            Credentials {
                username,
                password,
                server_url: server_url.to_string(),
            },
            source,
        ))
    }

    fn lookup(&self) -> Result<(String, String, CredentialSource), SetupError> {
        match (&self.env_username, &self.env_password) {
            (Some(username), Some(password)) => {
                return Ok((
                    username.clone(),
                    password.clone(),
                    CredentialSource::Environment,
                ));
            }
            (Some(_), None) => {
                return Err(SetupError::PartialEnvCredentials {
                    present: PGOUSERNAME,
                    missing: PGOUSERPASS,
                });
            }
            (None, Some(_)) => {
                return Err(SetupError::PartialEnvCredentials {
                    present: PGOUSERPASS,
                    missing: PGOUSERNAME,
                });
            }
            (None, None) => {}
        }

        if let Some(path) = &self.user_file {
            let contents =
                fs::read_to_string(path).map_err(|source| SetupError::CredentialFileUnreadable {
                    path: path.clone(),
                    source,
                })?;
            let (username, password) = parse_file(path, &contents)?;
            return Ok((username, password, CredentialSource::UserFile(path.clone())));
        }

        let mut searched = Vec::with_capacity(2);

        if let Some(home) = &self.home_dir {
            let path = home.join(USER_FILE_NAME);
            if let Some((username, password)) = read_optional(&path)? {
                return Ok((username, password, CredentialSource::HomeFile(path)));
            }
            searched.push(path);
        }

        if let Some((username, password)) = read_optional(&self.system_file)? {
            return Ok((
                username,
                password,
                CredentialSource::SystemFile(self.system_file.clone()),
            ));
        }
        searched.push(self.system_file.clone());

        Err(SetupError::NoCredentials { searched })
    }
}

fn parse_file(path: &Path, contents: &str) -> Result<(String, String), SetupError> {
    parse_credentials(contents).map_err(|reason| SetupError::CredentialFileInvalid {
        path: path.to_path_buf(),
        reason,
    })
}

/// `None` when the file does not exist; any other read failure is fatal.
fn read_optional(path: &Path) -> Result<Option<(String, String)>, SetupError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_file(path, &contents).map(Some),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SetupError::CredentialFileUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_simple_line() {
        assert_eq!(
            parse_credentials("alice:secret\n"),
            Ok(("alice".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn splits_on_first_colon_only() {
        assert_eq!(
            parse_credentials("a:b:c"),
            Ok(("a".to_string(), "b:c".to_string()))
        );
    }

    #[test]
    fn inner_whitespace_is_kept() {
        assert_eq!(
            parse_credentials("alice: pass \n"),
            Ok(("alice".to_string(), " pass".to_string()))
        );
        assert_eq!(
            parse_credentials("alice :p w"),
            Ok(("alice ".to_string(), "p w".to_string()))
        );
    }

    #[test]
    fn rejects_line_without_colon() {
        assert_eq!(
            parse_credentials("alice"),
            Err(CredentialParseError::MissingSeparator)
        );
    }

    #[test]
    fn rejects_more_than_one_line() {
        assert_eq!(
            parse_credentials("alice:secret\nbob:hunter2\n"),
            Err(CredentialParseError::MultipleLines(2))
        );
    }

    #[test]
    fn rejects_empty_parts() {
        assert_eq!(
            parse_credentials(":secret"),
            Err(CredentialParseError::EmptyUsername)
        );
        assert_eq!(
            parse_credentials("alice:"),
            Err(CredentialParseError::EmptyPassword)
        );
        assert_eq!(parse_credentials("  \n"), Err(CredentialParseError::Empty));
    }

    #[test]
    fn debug_redacts_password() {
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            server_url: "https://pgo:8443".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    proptest! {
        #[test]
        fn any_well_formed_line_round_trips(
            username in "[A-Za-z0-9_.-]{1,16}",
            password in "[A-Za-z0-9_.:!@#-]{1,24}",
        ) {
            let line = format!("  {username}:{password}  \n");
            let parsed = parse_credentials(&line);
            prop_assert_eq!(parsed, Ok((username, password)));
        }

        #[test]
        fn lines_without_colon_never_parse(line in "[A-Za-z0-9 _.-]{0,32}") {
            prop_assert!(parse_credentials(&line).is_err());
        }
    }
}
