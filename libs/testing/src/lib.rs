//! Test fixtures for the pgo client.
//!
//! [`TestPki`] mints a throwaway certificate authority with server and
//! client leaves and writes them out as PEM files. [`MtlsStubServer`] is a
//! minimal HTTP/1.1 server behind rustls that demands a client certificate
//! from that CA, answers every request with one canned response, and
//! counts TLS handshakes so tests can observe connection reuse.

mod pki;
mod server;

use std::sync::Once;

pub use pki::{PkiPaths, ServerIdentity, TestPki, DEFAULT_SERVER_NAMES};
pub use server::{MtlsStubServer, RecordedRequest, StubResponse};

static INIT_CRYPTO: Once = Once::new();

/// Install the ring provider as the process default, once.
pub fn init_crypto_provider() {
    INIT_CRYPTO.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .ok();
    });
}
