//! Diagnostic logging to stderr.
//!
//! stdout carries command output only. The default level is `warn`;
//! `--debug` raises this crate to `debug`, and `RUST_LOG` overrides both.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "warn,pgoctl=debug"
    } else {
        "warn"
    }
}

pub fn init(debug: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(debug).into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
