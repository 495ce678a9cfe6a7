use phishguard_common::TechnicalTruth;

/// The output contract the reasoning model is instructed to honor. Kept as
/// literal text so the instruction payload is stable across releases.
const VERDICT_SCHEMA: &str = r#"{
    "threat_assessment": {
        "level": "safe" | "suspicious" | "dangerous",
        "score": 0-100,
        "summary": "string"
    },
    "risk_factors": [{ "title": "string", "severity": "info"|"warning"|"critical" }],
    "recommendations": [{ "type": "block"|"report", "text": "string" }]
}"#;

/// Render the instruction payload for one technical truth record.
///
/// Pure function of its input: no I/O, no branching on signal content.
/// Absent values are rendered as "Unknown" exactly as gathered.
pub fn build_verdict_request(truth: &TechnicalTruth) -> String {
    let address = truth
        .address
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let age = truth
        .domain_age_days
        .map(|days| format!("{days} days"))
        .unwrap_or_else(|| "Unknown".to_string());
    let validity = if truth.certificate.valid {
        "Valid"
    } else {
        "Invalid"
    };
    let issuer = truth.certificate.issuer.as_deref().unwrap_or("Unknown");

    format!(
        r#"You are PhishGuard AI. Analyze this URL based on the technical truth below.

Technical Truth:
- URL: {url}
- Hostname: {hostname}
- IP: {address} ({location})
- Registrar: {registrar}
- Age: {age}
- SSL: {validity} (Issuer: {issuer})

Output STRICT JSON matching this schema:
{schema}"#,
        url = truth.url,
        hostname = truth.hostname,
        location = truth.location,
        registrar = truth.registration.registrar,
        schema = VERDICT_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishguard_common::{CertificateStatus, RegistrationRecord};

    fn sample_truth() -> TechnicalTruth {
        TechnicalTruth {
            url: "http://example.com".to_string(),
            hostname: "example.com".to_string(),
            address: Some("93.184.216.34".parse().unwrap()),
            location: "Los Angeles, US".to_string(),
            registration: RegistrationRecord {
                registrar: "RESERVED-Internet Assigned Numbers Authority".to_string(),
                creation_date: Some("1995-08-14T04:00:00Z".to_string()),
            },
            domain_age_days: Some(10957),
            certificate: CertificateStatus {
                valid: true,
                issuer: Some("DigiCert Inc".to_string()),
            },
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let truth = sample_truth();
        assert_eq!(build_verdict_request(&truth), build_verdict_request(&truth));
    }

    #[test]
    fn every_signal_appears_in_the_request() {
        let request = build_verdict_request(&sample_truth());
        assert!(request.contains("- URL: http://example.com"));
        assert!(request.contains("- Hostname: example.com"));
        assert!(request.contains("- IP: 93.184.216.34 (Los Angeles, US)"));
        assert!(request.contains("- Registrar: RESERVED-Internet Assigned Numbers Authority"));
        assert!(request.contains("- Age: 10957 days"));
        assert!(request.contains("- SSL: Valid (Issuer: DigiCert Inc)"));
        assert!(request.contains("\"threat_assessment\""));
    }

    #[test]
    fn absent_values_render_as_unknown() {
        let truth = TechnicalTruth {
            url: "http://example.com".to_string(),
            hostname: "example.com".to_string(),
            address: None,
            location: "Unknown".to_string(),
            registration: RegistrationRecord::default(),
            domain_age_days: None,
            certificate: CertificateStatus::default(),
        };

        let request = build_verdict_request(&truth);
        assert!(request.contains("- IP: Unknown (Unknown)"));
        assert!(request.contains("- Registrar: Unknown"));
        assert!(request.contains("- Age: Unknown"));
        assert!(request.contains("- SSL: Invalid (Issuer: Unknown)"));
    }

    #[test]
    fn negative_age_passes_through_as_rendered() {
        let mut truth = sample_truth();
        truth.domain_age_days = Some(-3);
        let request = build_verdict_request(&truth);
        assert!(request.contains("- Age: -3 days"));
    }
}
