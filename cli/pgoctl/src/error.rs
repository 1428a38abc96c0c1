//! Error taxonomy, exit codes and user-facing error display.

use std::io;
use std::path::PathBuf;

use colored::Colorize;
use pgo_msgs::{AddressingError, ApplicationError};
use thiserror::Error;

use crate::credentials::CredentialParseError;

/// Exit status for a successful run.
pub const EXIT_OK: i32 = 0;
/// Bad flags, missing namespace, config file trouble.
pub const EXIT_USAGE: i32 = 1;
/// A call failed at the transport, HTTP or application layer.
pub const EXIT_CALL: i32 = 2;
/// Credentials or TLS material could not be loaded.
pub const EXIT_SETUP: i32 = 3;

/// Failure to assemble a [`Session`](crate::Session). Always raised before
/// any network activity.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{present} is set but {missing} is not; set both or neither")]
    PartialEnvCredentials {
        present: &'static str,
        missing: &'static str,
    },

    #[error("cannot read credentials file {}: {source}", path.display())]
    CredentialFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid credentials file {}: {reason}", path.display())]
    CredentialFileInvalid {
        path: PathBuf,
        reason: CredentialParseError,
    },

    #[error("no credentials found (checked PGOUSERNAME/PGOUSERPASS, {})", searched_display(.searched))]
    NoCredentials { searched: Vec<PathBuf> },

    #[error("no API server URL; pass --apiserver-url or set PGO_APISERVER_URL")]
    MissingServerUrl,

    #[error("invalid API server URL {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("no {what} path; pass --{flag} or set {env}")]
    MissingTlsPath {
        what: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("cannot read {what} {}: {source}", path.display())]
    TlsFileUnreadable {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed PEM in {}: {source}", path.display())]
    InvalidPem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no certificates found in {}", path.display())]
    NoCertificates { path: PathBuf },

    #[error("no private key found in {}", path.display())]
    NoPrivateKey { path: PathBuf },

    #[error("invalid TLS material: {0}")]
    InvalidTlsMaterial(#[source] reqwest::Error),

    #[error("cannot build HTTPS client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

fn searched_display(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure of one remote call before an application status could be read.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("cannot encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid request URL {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Authentication Failed")]
    AuthenticationFailed,

    #[error("Invalid Status Code: {0}")]
    UnexpectedStatus(u16),

    #[error("cannot decode response: {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error the binary reports.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Addressing(#[from] AddressingError),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Setup(_) => EXIT_SETUP,
            Self::Call(_) | Self::Application(_) => EXIT_CALL,
            Self::Addressing(_) | Self::Usage(_) => EXIT_USAGE,
            Self::Other(inner) => exit_code(inner),
        }
    }
}

/// Exit status for an error returned by a command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if err.downcast_ref::<SetupError>().is_some() {
        return EXIT_SETUP;
    }
    if err.downcast_ref::<CallError>().is_some() || err.downcast_ref::<ApplicationError>().is_some()
    {
        return EXIT_CALL;
    }
    EXIT_USAGE
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(hint) = hint_for(err) {
        eprintln!("\n{}", hint.yellow());
    }
}

fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let call = err.downcast_ref::<CallError>().or_else(|| {
        err.downcast_ref::<CliError>().and_then(|cli_err| match cli_err {
            CliError::Call(call) => Some(call),
            _ => None,
        })
    });
    if let Some(call) = call {
        return match call {
            CallError::AuthenticationFailed => {
                Some("Hint: Check PGOUSERNAME/PGOUSERPASS or the contents of ~/.pgouser.")
            }
            CallError::UnexpectedStatus(403) => {
                Some("Hint: Your pgo role may not permit this operation.")
            }
            CallError::Transport(_) => {
                Some("Hint: Check the API server URL and the client certificate settings.")
            }
            CallError::Decode { .. } => {
                Some("Hint: The API server may be a different version; run `pgo version`.")
            }
            _ => None,
        };
    }

    let setup = err.downcast_ref::<SetupError>().or_else(|| {
        err.downcast_ref::<CliError>().and_then(|cli_err| match cli_err {
            CliError::Setup(setup) => Some(setup),
            _ => None,
        })
    });
    match setup {
        Some(SetupError::NoCredentials { .. }) => {
            Some("Hint: Write `username:password` to ~/.pgouser or set PGOUSERNAME and PGOUSERPASS.")
        }
        Some(SetupError::MissingTlsPath { .. }) => {
            Some("Hint: The CA bundle, client certificate and client key are all required.")
        }
        _ => None,
    }
}
