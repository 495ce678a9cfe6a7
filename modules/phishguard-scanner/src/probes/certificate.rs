use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

use phishguard_common::CertificateStatus;

use crate::probes::{ProbeError, PROBE_TIMEOUT};
use crate::traits::CertificateProbe;

const HTTPS_PORT: u16 = 443;

/// Certificate check via a live validating handshake against port 443.
///
/// Validity here is a coarse boolean signal: did a standard webpki-trusted
/// handshake succeed and name an issuer organization. No chain inspection
/// or revocation checking.
pub struct TlsProbe {
    connector: TlsConnector,
}

impl TlsProbe {
    pub fn new() -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            connector: TlsConnector::from(Arc::new(config)),
        }
    }
}

impl Default for TlsProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertificateProbe for TlsProbe {
    async fn inspect(&self, hostname: &str) -> Result<CertificateStatus, ProbeError> {
        let server_name = ServerName::try_from(hostname.to_string())
            .map_err(|e| ProbeError::Handshake(e.to_string()))?;

        let tcp = timeout(PROBE_TIMEOUT, TcpStream::connect((hostname, HTTPS_PORT)))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(|e| ProbeError::Connect(e.to_string()))?;

        let tls = timeout(PROBE_TIMEOUT, self.connector.connect(server_name, tcp))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(|e| ProbeError::Handshake(e.to_string()))?;

        let (_, session) = tls.get_ref();
        let leaf = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(ProbeError::MissingField("peer certificate"))?;

        let issuer = issuer_organization(leaf.as_ref())?;

        Ok(CertificateStatus {
            valid: true,
            issuer: Some(issuer),
        })
    }
}

/// Issuer organizationName from a DER-encoded certificate.
fn issuer_organization(der: &[u8]) -> Result<String, ProbeError> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|e| ProbeError::Malformed(e.to_string()))?;

    let org = cert
        .issuer()
        .iter_organization()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(|s| s.to_string())
        .ok_or(ProbeError::MissingField("issuer organization"));
    org
}
