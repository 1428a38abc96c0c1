use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::server::WebPkiClientVerifier;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;

use crate::init_crypto_provider;
use crate::pki::{ServerIdentity, TestPki};

/// The status and JSON body returned for every request.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP/1.1 over mutual TLS, answering every request with a fixed response.
pub struct MtlsStubServer {
    pub addr: SocketAddr,
    connections: Arc<AtomicU64>,
    handshakes: Arc<AtomicU64>,
    failed_handshakes: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MtlsStubServer {
    /// Spawn on 127.0.0.1 with `identity`, trusting client certificates
    /// issued by `pki`'s CA.
    pub async fn spawn(
        pki: &TestPki,
        identity: ServerIdentity,
        response: StubResponse,
    ) -> io::Result<Self> {
        init_crypto_provider();

        // Trust roots come from the same PEM bundle handed to the client.
        let mut roots = rustls::RootCertStore::empty();
        let ca_pem = pki.ca_cert_pem();
        for cert in rustls_pemfile::certs(&mut ca_pem.as_bytes()) {
            roots.add(cert?).map_err(io::Error::other)?;
        }
        let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
            .build()
            .map_err(io::Error::other)?;

        let certs = vec![CertificateDer::from(identity.cert_der)];
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(identity.key_der));

        let mut config = rustls::ServerConfig::builder()
            .with_client_cert_verifier(verifier)
            .with_single_cert(certs, key)
            .map_err(io::Error::other)?;
        config.alpn_protocols = vec![b"http/1.1".to_vec()];

        let acceptor = TlsAcceptor::from(Arc::new(config));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let connections = Arc::new(AtomicU64::new(0));
        let handshakes = Arc::new(AtomicU64::new(0));
        let failed_handshakes = Arc::new(AtomicU64::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let conn_clone = Arc::clone(&connections);
        let ok_clone = Arc::clone(&handshakes);
        let failed_clone = Arc::clone(&failed_handshakes);
        let requests_clone = Arc::clone(&requests);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accept_result = listener.accept() => {
                        match accept_result {
                            Ok((stream, _)) => {
                                conn_clone.fetch_add(1, Ordering::Relaxed);
                                let acceptor = acceptor.clone();
                                let handshakes = Arc::clone(&ok_clone);
                                let failed = Arc::clone(&failed_clone);
                                let requests = Arc::clone(&requests_clone);
                                let response = response.clone();
                                tokio::spawn(async move {
                                    match acceptor.accept(stream).await {
                                        Ok(tls_stream) => {
                                            handshakes.fetch_add(1, Ordering::Relaxed);
                                            let _ = serve(tls_stream, &requests, &response).await;
                                        }
                                        Err(_) => {
                                            failed.fetch_add(1, Ordering::Relaxed);
                                        }
                                    }
                                });
                            }
                            Err(_) => break,
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        });

        Ok(Self {
            addr,
            connections,
            handshakes,
            failed_handshakes,
            requests,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// `https://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("https://{}", self.addr)
    }

    pub fn connection_count(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }

    /// Completed TLS handshakes.
    pub fn handshake_count(&self) -> u64 {
        self.handshakes.load(Ordering::Relaxed)
    }

    /// Connections whose TLS handshake failed, on either side.
    pub fn failed_handshake_count(&self) -> u64 {
        self.failed_handshakes.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Drop for MtlsStubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve<S>(
    mut stream: S,
    requests: &Mutex<Vec<RecordedRequest>>,
    response: &StubResponse,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    while let Some(request) = read_request(&mut stream, &mut buf).await? {
        if let Ok(mut guard) = requests.lock() {
            guard.push(request);
        }
        let raw = format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
            response.status,
            reason(response.status),
            response.body.len(),
            response.body
        );
        stream.write_all(raw.as_bytes()).await?;
        stream.flush().await?;
    }
    Ok(())
}

/// Read one request, keeping any bytes past it in `buf`. `None` on a clean
/// close between requests.
async fn read_request<S>(stream: &mut S, buf: &mut Vec<u8>) -> io::Result<Option<RecordedRequest>>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(head_end) = find_head_end(buf) {
            let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
            let mut lines = head.split("\r\n");
            let mut request_line = lines.next().unwrap_or_default().split_whitespace();
            let method = request_line.next().unwrap_or_default().to_string();
            let path = request_line.next().unwrap_or_default().to_string();

            let headers: Vec<(String, String)> = lines
                .filter_map(|line| line.split_once(':'))
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
                .collect();
            let content_length = headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.parse::<usize>().ok())
                .unwrap_or(0);

            let total = head_end + 4 + content_length;
            while buf.len() < total {
                let n = stream.read(&mut chunk).await?;
                if n == 0 {
                    return Err(io::ErrorKind::UnexpectedEof.into());
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = buf[head_end + 4..total].to_vec();
            buf.drain(..total);

            return Ok(Some(RecordedRequest {
                method,
                path,
                headers,
                body,
            }));
        }

        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_request_with_body_and_keeps_remainder() {
        let raw = b"POST /clusters HTTP/1.1\r\nHost: x\r\nContent-Length: 2\r\n\r\n{}GET /version HTTP/1.1\r\n\r\n";
        let mut reader = &raw[..];
        let mut buf = Vec::new();

        let first = read_request(&mut reader, &mut buf).await.unwrap().unwrap();
        assert_eq!(first.method, "POST");
        assert_eq!(first.path, "/clusters");
        assert_eq!(first.body, b"{}");
        assert_eq!(first.header("content-length"), Some("2"));

        let second = read_request(&mut reader, &mut buf).await.unwrap().unwrap();
        assert_eq!(second.method, "GET");
        assert!(second.body.is_empty());

        assert!(read_request(&mut reader, &mut buf).await.unwrap().is_none());
    }
}
