// Mock collaborators for deterministic pipeline tests: no DNS, no WHOIS,
// no TLS, no HTTP. Each mock counts invocations so tests can assert that a
// collaborator was (or was not) consulted.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use phishguard_common::{CertificateStatus, RegistrationRecord};

use crate::probes::ProbeError;
use crate::traits::{
    AddressResolver, CertificateProbe, GeoLookup, ReasoningAgent, RegistrationSource,
};

// --- MockResolver ---

pub struct MockResolver {
    reply: Result<IpAddr, ProbeError>,
    invocations: AtomicUsize,
}

impl MockResolver {
    pub fn returning(address: &str) -> Self {
        Self {
            reply: Ok(address.parse().unwrap()),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(ProbeError::Resolve("mock resolution failure".to_string())),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressResolver for MockResolver {
    async fn resolve(&self, _hostname: &str) -> Result<IpAddr, ProbeError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

// --- MockRegistration ---

pub struct MockRegistration {
    reply: Result<RegistrationRecord, ProbeError>,
}

impl MockRegistration {
    pub fn returning(registrar: &str, creation_date: Option<&str>) -> Self {
        Self {
            reply: Ok(RegistrationRecord {
                registrar: registrar.to_string(),
                creation_date: creation_date.map(str::to_string),
            }),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(ProbeError::Timeout),
        }
    }
}

#[async_trait]
impl RegistrationSource for MockRegistration {
    async fn lookup(&self, _hostname: &str) -> Result<RegistrationRecord, ProbeError> {
        self.reply.clone()
    }
}

// --- MockCertificate ---

pub struct MockCertificate {
    reply: Result<CertificateStatus, ProbeError>,
}

impl MockCertificate {
    pub fn valid(issuer: &str) -> Self {
        Self {
            reply: Ok(CertificateStatus {
                valid: true,
                issuer: Some(issuer.to_string()),
            }),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(ProbeError::Handshake("mock handshake failure".to_string())),
        }
    }
}

#[async_trait]
impl CertificateProbe for MockCertificate {
    async fn inspect(&self, _hostname: &str) -> Result<CertificateStatus, ProbeError> {
        self.reply.clone()
    }
}

// --- MockGeo ---

pub struct MockGeo {
    reply: Result<String, ProbeError>,
    invocations: AtomicUsize,
}

impl MockGeo {
    pub fn returning(location: &str) -> Self {
        Self {
            reply: Ok(location.to_string()),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::erroring(ProbeError::Connect("mock geolocation failure".to_string()))
    }

    pub fn erroring(error: ProbeError) -> Self {
        Self {
            reply: Err(error),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for MockGeo {
    async fn locate(&self, _address: IpAddr) -> Result<String, ProbeError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

// --- MockAgent ---

pub struct MockAgent {
    reply: Result<String, String>,
    invocations: AtomicUsize,
    last_request: Mutex<Option<String>>,
}

impl MockAgent {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            invocations: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn erroring(cause: &str) -> Self {
        Self {
            reply: Err(cause.to_string()),
            invocations: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// The most recent instruction payload this agent received.
    pub fn last_request(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReasoningAgent for MockAgent {
    async fn classify(&self, instructions: &str) -> Result<String> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(instructions.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(cause) => Err(anyhow!("{cause}")),
        }
    }
}
