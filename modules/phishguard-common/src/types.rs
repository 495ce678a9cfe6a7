use std::net::IpAddr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Gathered signals ---

/// Domain registration data from a WHOIS lookup.
///
/// `creation_date` is kept as the raw registry string; age derivation
/// happens later so an unparseable date still reaches the prompt verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegistrationRecord {
    pub registrar: String,
    pub creation_date: Option<String>,
}

impl Default for RegistrationRecord {
    fn default() -> Self {
        Self {
            registrar: "Unknown".to_string(),
            creation_date: None,
        }
    }
}

/// Outcome of a validating TLS handshake against port 443.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CertificateStatus {
    pub valid: bool,
    pub issuer: Option<String>,
}

/// The merged, point-in-time record of all gathered signals for one request.
///
/// Fully populated before prompt rendering — failed lookups are represented
/// by their defaults ("Unknown"/absent), never by missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TechnicalTruth {
    pub url: String,
    pub hostname: String,
    pub address: Option<IpAddr>,
    pub location: String,
    pub registration: RegistrationRecord,
    pub domain_age_days: Option<i64>,
    pub certificate: CertificateStatus,
}

// --- Verdict schema ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Safe,
    Suspicious,
    Dangerous,
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatLevel::Safe => write!(f, "safe"),
            ThreatLevel::Suspicious => write!(f, "suspicious"),
            ThreatLevel::Dangerous => write!(f, "dangerous"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThreatAssessment {
    pub level: ThreatLevel,
    pub score: u8,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RiskFactor {
    pub title: String,
    pub severity: RiskSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Block,
    Report,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub text: String,
}

/// The structured threat classification returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub threat_assessment: ThreatAssessment,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_parses_wire_format() {
        let raw = r#"{
            "threat_assessment": {"level": "suspicious", "score": 72, "summary": "Young domain"},
            "risk_factors": [{"title": "Domain registered recently", "severity": "warning"}],
            "recommendations": [{"type": "block", "text": "Do not enter credentials"}]
        }"#;
        let verdict: Verdict = serde_json::from_str(raw).unwrap();
        assert_eq!(verdict.threat_assessment.level, ThreatLevel::Suspicious);
        assert_eq!(verdict.threat_assessment.score, 72);
        assert_eq!(verdict.recommendations[0].kind, RecommendationType::Block);
    }

    #[test]
    fn verdict_rejects_unknown_level() {
        let raw = r#"{
            "threat_assessment": {"level": "catastrophic", "score": 10, "summary": "x"},
            "risk_factors": [],
            "recommendations": []
        }"#;
        assert!(serde_json::from_str::<Verdict>(raw).is_err());
    }

    #[test]
    fn recommendation_kind_serializes_as_type() {
        let rec = Recommendation {
            kind: RecommendationType::Report,
            text: "Report to the registrar".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "report");
    }

    #[test]
    fn registration_default_is_unknown() {
        let reg = RegistrationRecord::default();
        assert_eq!(reg.registrar, "Unknown");
        assert!(reg.creation_date.is_none());
    }
}
