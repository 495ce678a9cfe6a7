use std::net::IpAddr;

use async_trait::async_trait;
use tokio::time::timeout;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};

use crate::probes::{ProbeError, PROBE_TIMEOUT};
use crate::traits::AddressResolver;

/// Forward DNS lookup through the system's configured upstream.
///
/// The resolver runs on the tokio reactor, so a slow upstream never
/// occupies the scheduler. One attempt per request, no retries.
pub struct DnsProbe {
    resolver: TokioAsyncResolver,
}

impl DnsProbe {
    pub fn new() -> Self {
        let mut opts = ResolverOpts::default();
        opts.attempts = 1;
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }
}

impl Default for DnsProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressResolver for DnsProbe {
    async fn resolve(&self, hostname: &str) -> Result<IpAddr, ProbeError> {
        let lookup = timeout(PROBE_TIMEOUT, self.resolver.lookup_ip(hostname))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(|e| ProbeError::Resolve(e.to_string()))?;

        lookup
            .iter()
            .next()
            .ok_or(ProbeError::MissingField("address"))
    }
}
