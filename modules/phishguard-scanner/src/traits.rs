// Trait abstractions for the analyzer's external collaborators.
//
// One trait per capability: DNS, WHOIS, TLS, geolocation, reasoning.
// The analyzer takes these as injected handles rather than constructing
// clients at process start, so tests substitute mocks with no network.

use std::net::IpAddr;

use anyhow::Result;
use async_trait::async_trait;

use phishguard_common::{CertificateStatus, RegistrationRecord};

use crate::probes::ProbeError;

/// Forward DNS resolution: hostname → one address.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> Result<IpAddr, ProbeError>;
}

/// Domain registration data (WHOIS): hostname → registrar / creation date.
#[async_trait]
pub trait RegistrationSource: Send + Sync {
    async fn lookup(&self, hostname: &str) -> Result<RegistrationRecord, ProbeError>;
}

/// Live TLS handshake against port 443: hostname → validity + issuer.
#[async_trait]
pub trait CertificateProbe: Send + Sync {
    async fn inspect(&self, hostname: &str) -> Result<CertificateStatus, ProbeError>;
}

/// Geolocation of a resolved address, formatted as "<city>, <countryCode>".
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn locate(&self, address: IpAddr) -> Result<String, ProbeError>;
}

/// The reasoning capability: instruction text in, JSON text out.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    async fn classify(&self, instructions: &str) -> Result<String>;
}

#[async_trait]
impl ReasoningAgent for ai_client::Groq {
    async fn classify(&self, instructions: &str) -> Result<String> {
        self.json_completion(instructions).await
    }
}
