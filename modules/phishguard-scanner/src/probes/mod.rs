pub mod certificate;
pub mod dns;
pub mod geoip;
pub mod registration;

pub use certificate::TlsProbe;
pub use dns::DnsProbe;
pub use geoip::IpApiProbe;
pub use registration::WhoisProbe;

use std::time::Duration;

use thiserror::Error;

/// Upper bound on every individual signal probe. A probe either succeeds
/// within this window or the assembler substitutes its default value.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Enumerated per-collaborator failure causes.
///
/// Every variant maps to the same typed default at the assembly boundary;
/// the variant exists so the cause is inspectable in logs.
#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("resolution failed: {0}")]
    Resolve(String),

    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    #[error("response missing field: {0}")]
    MissingField(&'static str),

    #[error("malformed response: {0}")]
    Malformed(String),
}
