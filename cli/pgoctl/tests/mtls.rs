//! End-to-end calls over mutual TLS against a local stub server.

use std::collections::HashMap;
use std::time::Duration;

use pgo_msgs::system::VersionResult;
use pgo_msgs::ResponseEnvelope;
use pgo_testing::{MtlsStubServer, PkiPaths, StubResponse, TestPki, DEFAULT_SERVER_NAMES};
use pgoctl::env::{PGOUSERNAME, PGOUSERPASS, PGO_DISABLE_TLS_HOSTNAME_VERIFICATION};
use pgoctl::{api, CallError, CredentialStore, SecureChannel, Session, SessionOptions};
use tempfile::TempDir;

const VERSION_BODY: &str = r#"{"Status":{"Code":"ok","Msg":""},"Version":"4.5.0"}"#;

struct Fixture {
    pki: TestPki,
    paths: PkiPaths,
    _dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let pki = TestPki::generate().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let paths = pki.write_to(dir.path()).unwrap();
        Self {
            pki,
            paths,
            _dir: dir,
        }
    }

    async fn server(&self, names: &[&str]) -> MtlsStubServer {
        let identity = self.pki.server_identity(names).unwrap();
        MtlsStubServer::spawn(&self.pki, identity, StubResponse::json(200, VERSION_BODY))
            .await
            .unwrap()
    }

    fn session(&self, server: &MtlsStubServer, env: &HashMap<&str, &str>) -> Session {
        let options = SessionOptions {
            apiserver_url: Some(server.base_url()),
            ca_cert: Some(self.paths.ca_cert.clone()),
            client_cert: Some(self.paths.client_cert.clone()),
            client_key: Some(self.paths.client_key.clone()),
            disable_hostname_verification: false,
        };
        let store = CredentialStore::from_env(env).with_home_dir(None);
        Session::establish_with(&options, env, None, store).unwrap()
    }
}

fn credentials_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([(PGOUSERNAME, "alice"), (PGOUSERPASS, "secret")])
}

async fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..50 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

#[tokio::test]
async fn call_succeeds_over_mutual_tls() {
    let fixture = Fixture::new();
    let server = fixture.server(DEFAULT_SERVER_NAMES).await;
    let session = fixture.session(&server, &credentials_env());

    let envelope = api::system::version(&session).await.unwrap();
    assert_eq!(envelope.into_result().unwrap().version, "4.5.0");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/version");
    assert_eq!(
        requests[0].header("authorization"),
        Some("Basic YWxpY2U6c2VjcmV0")
    );
}

#[tokio::test]
async fn sequential_calls_reuse_one_handshake() {
    let fixture = Fixture::new();
    let server = fixture.server(DEFAULT_SERVER_NAMES).await;
    let session = fixture.session(&server, &credentials_env());

    for _ in 0..3 {
        let envelope: ResponseEnvelope<VersionResult> =
            api::system::version(&session).await.unwrap();
        assert!(envelope.is_ok());
    }

    assert_eq!(server.requests().len(), 3);
    assert_eq!(server.handshake_count(), 1);
    assert_eq!(server.connection_count(), 1);
}

#[tokio::test]
async fn hostname_mismatch_is_rejected_by_default() {
    let fixture = Fixture::new();
    let server = fixture.server(&["pgo.invalid"]).await;
    let session = fixture.session(&server, &credentials_env());

    let err = api::system::version(&session).await.unwrap_err();
    assert!(matches!(err, CallError::Transport(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn hostname_mismatch_is_accepted_when_verification_is_disabled() {
    let fixture = Fixture::new();
    let server = fixture.server(&["pgo.invalid"]).await;
    let mut env = credentials_env();
    env.insert(PGO_DISABLE_TLS_HOSTNAME_VERIFICATION, "true");
    let session = fixture.session(&server, &env);

    let envelope = api::system::version(&session).await.unwrap();
    assert!(envelope.is_ok());
    assert_eq!(server.handshake_count(), 1);
}

#[tokio::test]
async fn client_without_certificate_is_refused() {
    let fixture = Fixture::new();
    let server = fixture.server(DEFAULT_SERVER_NAMES).await;

    let ca = reqwest::Certificate::from_pem(fixture.pki.ca_cert_pem().as_bytes()).unwrap();
    let client = reqwest::Client::builder()
        .use_rustls_tls()
        .tls_built_in_root_certs(false)
        .add_root_certificate(ca)
        .build()
        .unwrap();
    let credentials = CredentialStore::from_env(&credentials_env())
        .with_home_dir(None)
        .resolve(&server.base_url())
        .unwrap();
    let session = Session::new(credentials, SecureChannel::from_client(client));

    let err = api::system::version(&session).await.unwrap_err();
    assert!(matches!(err, CallError::Transport(_)));
    assert!(wait_for(|| server.failed_handshake_count() >= 1).await);
    assert!(server.requests().is_empty());
}
