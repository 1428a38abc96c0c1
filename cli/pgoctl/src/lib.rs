//! # pgoctl
//!
//! Authenticated transport and command tree for the `pgo` CLI.
//!
//! A [`Session`] binds resolved [`Credentials`] to a mutually authenticated
//! [`SecureChannel`]. Every API operation is a [`Call`] executed through the
//! session: the HTTP status is classified first, then the JSON body is decoded
//! into a response envelope whose application status the caller inspects.

pub mod api;
pub mod channel;
pub mod classify;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod env;
pub mod error;
pub mod executor;
pub mod logging;
pub mod output;
pub mod session;

pub use channel::{ChannelPaths, SecureChannel, SecureChannelBuilder};
pub use classify::{classify, StatusClass};
pub use commands::Cli;
pub use credentials::{CredentialSource, CredentialStore, Credentials};
pub use env::{EnvSource, ProcessEnv};
pub use error::{CallError, CliError, SetupError};
pub use executor::Call;
pub use session::{Session, SessionOptions};
