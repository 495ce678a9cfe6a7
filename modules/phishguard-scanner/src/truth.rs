use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use phishguard_common::{CertificateStatus, RegistrationRecord, TechnicalTruth};

use crate::probes::{geoip, DnsProbe, IpApiProbe, TlsProbe, WhoisProbe};
use crate::traits::{AddressResolver, CertificateProbe, GeoLookup, RegistrationSource};

/// Injected probe set for one analyzer instance.
#[derive(Clone)]
pub struct Probes {
    pub address: Arc<dyn AddressResolver>,
    pub registration: Arc<dyn RegistrationSource>,
    pub certificate: Arc<dyn CertificateProbe>,
    pub geo: Arc<dyn GeoLookup>,
}

impl Probes {
    /// The production probe set: live DNS, WHOIS, TLS and ip-api lookups.
    pub fn production() -> Self {
        Self {
            address: Arc::new(DnsProbe::new()),
            registration: Arc::new(WhoisProbe),
            certificate: Arc::new(TlsProbe::new()),
            geo: Arc::new(IpApiProbe::new()),
        }
    }
}

/// Gather every signal for one hostname and merge them into a
/// [`TechnicalTruth`].
///
/// The three independent probes run concurrently and each failure is
/// absorbed into its default value, so this step itself cannot fail and
/// the returned record is always fully populated. Geolocation runs after
/// the join because it needs the resolved address.
pub async fn assemble(probes: &Probes, url: &str, hostname: &str) -> TechnicalTruth {
    let (address, registration, certificate) = tokio::join!(
        async {
            match probes.address.resolve(hostname).await {
                Ok(ip) => Some(ip),
                Err(e) => {
                    debug!(error = %e, hostname, "Address resolution failed");
                    None
                }
            }
        },
        async {
            match probes.registration.lookup(hostname).await {
                Ok(record) => record,
                Err(e) => {
                    debug!(error = %e, hostname, "Registration lookup failed");
                    RegistrationRecord::default()
                }
            }
        },
        async {
            match probes.certificate.inspect(hostname).await {
                Ok(status) => status,
                Err(e) => {
                    debug!(error = %e, hostname, "Certificate inspection failed");
                    CertificateStatus::default()
                }
            }
        },
    );

    let location = geoip::locate_address(probes.geo.as_ref(), address).await;

    let domain_age_days = registration
        .creation_date
        .as_deref()
        .and_then(|raw| domain_age_days(raw, Utc::now().date_naive()));

    TechnicalTruth {
        url: url.to_string(),
        hostname: hostname.to_string(),
        address,
        location,
        registration,
        domain_age_days,
        certificate,
    }
}

/// Whole-day difference between `today` and a registry creation date.
///
/// Only the date portion is considered: the value before the first
/// whitespace or `T` separator must parse as `%Y-%m-%d`; anything else
/// yields `None`. Not clamped — a creation date in the future comes back
/// negative.
pub fn domain_age_days(raw: &str, today: NaiveDate) -> Option<i64> {
    let date_part = raw
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;
    let created = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some((today - created).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::probes::ProbeError;
    use crate::testing::{MockCertificate, MockGeo, MockRegistration, MockResolver};

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 1, 11).unwrap()
    }

    #[test]
    fn age_is_exact_whole_day_difference() {
        assert_eq!(domain_age_days("2010-01-01", fixed_today()), Some(10));
    }

    #[test]
    fn age_ignores_time_component() {
        assert_eq!(
            domain_age_days("2010-01-01 04:00:00", fixed_today()),
            Some(10)
        );
        assert_eq!(
            domain_age_days("2010-01-01T04:00:00Z", fixed_today()),
            Some(10)
        );
    }

    #[test]
    fn unparseable_date_is_unknown() {
        assert_eq!(domain_age_days("14 August 1995", fixed_today()), None);
        assert_eq!(domain_age_days("", fixed_today()), None);
        assert_eq!(domain_age_days("2010-13-40", fixed_today()), None);
    }

    #[test]
    fn future_date_is_negative_not_unknown() {
        assert_eq!(domain_age_days("2010-01-21", fixed_today()), Some(-10));
    }

    #[tokio::test]
    async fn all_probe_failures_still_yield_complete_truth() {
        let probes = Probes {
            address: Arc::new(MockResolver::failing()),
            registration: Arc::new(MockRegistration::failing()),
            certificate: Arc::new(MockCertificate::failing()),
            geo: Arc::new(MockGeo::failing()),
        };

        let truth = assemble(&probes, "http://example.com", "example.com").await;

        assert_eq!(truth.hostname, "example.com");
        assert!(truth.address.is_none());
        assert_eq!(truth.location, "Unknown");
        assert_eq!(truth.registration, RegistrationRecord::default());
        assert!(truth.domain_age_days.is_none());
        assert_eq!(truth.certificate, CertificateStatus::default());
    }

    #[tokio::test]
    async fn geolocation_is_skipped_without_an_address() {
        let geo = Arc::new(MockGeo::returning("Oslo, NO"));
        let probes = Probes {
            address: Arc::new(MockResolver::failing()),
            registration: Arc::new(MockRegistration::failing()),
            certificate: Arc::new(MockCertificate::failing()),
            geo: geo.clone(),
        };

        let truth = assemble(&probes, "http://example.com", "example.com").await;

        assert_eq!(truth.location, "Unknown");
        assert_eq!(geo.calls(), 0);
    }

    #[tokio::test]
    async fn geolocation_runs_after_successful_resolution() {
        let geo = Arc::new(MockGeo::returning("Oslo, NO"));
        let probes = Probes {
            address: Arc::new(MockResolver::returning("93.184.216.34")),
            registration: Arc::new(MockRegistration::returning(
                "RESERVED-Internet Assigned Numbers Authority",
                Some("1995-08-14T04:00:00Z"),
            )),
            certificate: Arc::new(MockCertificate::valid("DigiCert Inc")),
            geo: geo.clone(),
        };

        let truth = assemble(&probes, "http://example.com", "example.com").await;

        assert_eq!(truth.location, "Oslo, NO");
        assert_eq!(geo.calls(), 1);
        assert_eq!(
            truth.address.map(|ip| ip.to_string()),
            Some("93.184.216.34".to_string())
        );
        assert!(truth.domain_age_days.is_some());
        assert!(truth.certificate.valid);
    }

    #[tokio::test]
    async fn one_failed_probe_does_not_disturb_the_others() {
        let probes = Probes {
            address: Arc::new(MockResolver::returning("93.184.216.34")),
            registration: Arc::new(MockRegistration::failing()),
            certificate: Arc::new(MockCertificate::valid("DigiCert Inc")),
            geo: Arc::new(MockGeo::erroring(ProbeError::Timeout)),
        };

        let truth = assemble(&probes, "http://example.com", "example.com").await;

        assert!(truth.address.is_some());
        assert_eq!(truth.registration.registrar, "Unknown");
        assert!(truth.certificate.valid);
        assert_eq!(truth.location, "Unknown");
    }
}
