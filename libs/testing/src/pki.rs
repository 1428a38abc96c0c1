use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose,
};

/// Subject names every default server certificate carries.
pub const DEFAULT_SERVER_NAMES: &[&str] = &["localhost", "127.0.0.1"];

/// A certificate authority plus one client leaf issued by it.
pub struct TestPki {
    ca_cert: Certificate,
    ca_key: KeyPair,
    pub client_cert_pem: String,
    pub client_key_pem: String,
}

/// A server leaf in DER form, ready for a rustls `ServerConfig`.
pub struct ServerIdentity {
    pub cert_der: Vec<u8>,
    pub key_der: Vec<u8>,
}

/// Where [`TestPki::write_to`] put each PEM file.
#[derive(Debug, Clone)]
pub struct PkiPaths {
    pub ca_cert: PathBuf,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
}

impl TestPki {
    pub fn generate() -> io::Result<Self> {
        let ca_key = KeyPair::generate().map_err(io::Error::other)?;
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).map_err(io::Error::other)?;
        ca_params
            .distinguished_name
            .push(DnType::CommonName, "pgo test ca");
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let ca_cert = ca_params.self_signed(&ca_key).map_err(io::Error::other)?;

        let client_key = KeyPair::generate().map_err(io::Error::other)?;
        let mut client_params =
            CertificateParams::new(Vec::<String>::new()).map_err(io::Error::other)?;
        client_params
            .distinguished_name
            .push(DnType::CommonName, "pgo test client");
        client_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ClientAuth];
        let client_cert = client_params
            .signed_by(&client_key, &ca_cert, &ca_key)
            .map_err(io::Error::other)?;

        Ok(Self {
            client_cert_pem: client_cert.pem(),
            client_key_pem: client_key.serialize_pem(),
            ca_cert,
            ca_key,
        })
    }

    pub fn ca_cert_pem(&self) -> String {
        self.ca_cert.pem()
    }

    pub fn ca_cert_der(&self) -> Vec<u8> {
        self.ca_cert.der().to_vec()
    }

    /// Issue a server leaf for `names` (DNS names or IP literals).
    pub fn server_identity(&self, names: &[&str]) -> io::Result<ServerIdentity> {
        let key = KeyPair::generate().map_err(io::Error::other)?;
        let mut params = CertificateParams::new(
            names.iter().map(|name| name.to_string()).collect::<Vec<_>>(),
        )
        .map_err(io::Error::other)?;
        params
            .distinguished_name
            .push(DnType::CommonName, "pgo test apiserver");
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        let cert = params
            .signed_by(&key, &self.ca_cert, &self.ca_key)
            .map_err(io::Error::other)?;

        Ok(ServerIdentity {
            cert_der: cert.der().to_vec(),
            key_der: key.serialize_der(),
        })
    }

    /// Write `ca.crt`, `client.crt` and `client.key` into `dir`.
    pub fn write_to(&self, dir: &Path) -> io::Result<PkiPaths> {
        let paths = PkiPaths {
            ca_cert: dir.join("ca.crt"),
            client_cert: dir.join("client.crt"),
            client_key: dir.join("client.key"),
        };
        fs::write(&paths.ca_cert, self.ca_cert_pem())?;
        fs::write(&paths.client_cert, &self.client_cert_pem)?;
        fs::write(&paths.client_key, &self.client_key_pem)?;
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_pem_files_parse_back() {
        let dir = tempfile::tempdir().unwrap();

        let pki = TestPki::generate().unwrap();
        let paths = pki.write_to(dir.path()).unwrap();

        let ca = fs::read(&paths.ca_cert).unwrap();
        let ca_certs: Vec<_> = rustls_pemfile::certs(&mut ca.as_slice())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(ca_certs.len(), 1);
        assert_eq!(ca_certs[0].as_ref(), pki.ca_cert_der().as_slice());

        let client = fs::read(&paths.client_cert).unwrap();
        assert_eq!(rustls_pemfile::certs(&mut client.as_slice()).count(), 1);

        let key = fs::read(&paths.client_key).unwrap();
        let key = rustls_pemfile::private_key(&mut key.as_slice()).unwrap();
        assert!(key.is_some());
    }

    #[test]
    fn server_identity_is_signed_der() {
        let pki = TestPki::generate().unwrap();
        let identity = pki.server_identity(DEFAULT_SERVER_NAMES).unwrap();
        assert!(!identity.cert_der.is_empty());
        assert!(!identity.key_der.is_empty());
    }
}
