use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use phishguard_common::RegistrationRecord;

use crate::probes::{ProbeError, PROBE_TIMEOUT};
use crate::traits::RegistrationSource;

const IANA_WHOIS: &str = "whois.iana.org";
const WHOIS_PORT: u16 = 43;

/// WHOIS lookup over the plain-text port 43 protocol.
///
/// Queries the IANA root for the TLD's referral server, then asks that
/// server for the domain record. Registries disagree on field labels and
/// repeat fields freely; `field_values` collects candidates in response
/// order and callers take the first.
pub struct WhoisProbe;

#[async_trait]
impl RegistrationSource for WhoisProbe {
    async fn lookup(&self, hostname: &str) -> Result<RegistrationRecord, ProbeError> {
        let domain = registrable_domain(hostname);

        let referral = query(IANA_WHOIS, domain).await?;
        let response = match field_values(&referral, &["refer", "whois"]).first() {
            Some(server) => query(server, domain).await?,
            None => referral,
        };

        let registrar = field_values(&response, &["Registrar", "Sponsoring Registrar"])
            .first()
            .map(|s| s.to_string())
            .ok_or(ProbeError::MissingField("registrar"))?;

        // A registry that withholds dates is still a successful lookup.
        let creation_date = field_values(&response, &["Creation Date", "created", "Registered on"])
            .first()
            .map(|s| s.to_string());

        Ok(RegistrationRecord {
            registrar,
            creation_date,
        })
    }
}

async fn query(server: &str, name: &str) -> Result<String, ProbeError> {
    let mut stream = timeout(PROBE_TIMEOUT, TcpStream::connect((server, WHOIS_PORT)))
        .await
        .map_err(|_| ProbeError::Timeout)?
        .map_err(|e| ProbeError::Connect(e.to_string()))?;

    stream
        .write_all(format!("{name}\r\n").as_bytes())
        .await
        .map_err(|e| ProbeError::Connect(e.to_string()))?;

    let mut response = Vec::new();
    timeout(PROBE_TIMEOUT, stream.read_to_end(&mut response))
        .await
        .map_err(|_| ProbeError::Timeout)?
        .map_err(|e| ProbeError::Connect(e.to_string()))?;

    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Strip subdomains: WHOIS servers answer for the registrable domain, not
/// arbitrary hosts.
// TODO: use a public suffix list for multi-label TLDs (co.uk, com.au).
fn registrable_domain(hostname: &str) -> &str {
    let mut labels = hostname.rsplitn(3, '.');
    let tld = labels.next();
    let second = labels.next();
    match (second, tld) {
        (Some(second), Some(tld)) => {
            let offset = hostname.len() - second.len() - tld.len() - 1;
            &hostname[offset..]
        }
        _ => hostname,
    }
}

/// Every value for any of `keys`, in response order.
///
/// WHOIS output is line-oriented `Key: value`; a field may appear once or
/// many times, so the result is always an ordered collection.
fn field_values<'a>(response: &'a str, keys: &[&str]) -> Vec<&'a str> {
    response
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            keys.iter()
                .any(|k| key.eq_ignore_ascii_case(k))
                .then_some(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const THICK_RESPONSE: &str = "\
Domain Name: EXAMPLE.COM
Registrar: RESERVED-Internet Assigned Numbers Authority
Registrar URL: http://res-dom.iana.org
Creation Date: 1995-08-14T04:00:00Z
Creation Date: 1995-08-14T04:00:00Z
Updated Date: 2024-08-14T07:01:34Z
";

    #[test]
    fn first_of_repeated_field_lines() {
        let dates = field_values(THICK_RESPONSE, &["Creation Date"]);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0], "1995-08-14T04:00:00Z");
    }

    #[test]
    fn single_and_repeated_fields_normalize_identically() {
        let single = "Creation Date: 1995-08-14T04:00:00Z\n";
        let repeated = "Creation Date: 1995-08-14T04:00:00Z\nCreation Date: 2001-01-01T00:00:00Z\n";
        assert_eq!(
            field_values(single, &["Creation Date"]).first(),
            field_values(repeated, &["Creation Date"]).first(),
        );
    }

    #[test]
    fn registrar_url_does_not_match_registrar() {
        let registrars = field_values(THICK_RESPONSE, &["Registrar"]);
        assert_eq!(
            registrars,
            vec!["RESERVED-Internet Assigned Numbers Authority"]
        );
    }

    #[test]
    fn key_match_is_case_insensitive() {
        let response = "created: 2003-09-15\n";
        assert_eq!(field_values(response, &["Created"]), vec!["2003-09-15"]);
    }

    #[test]
    fn empty_values_are_skipped() {
        let response = "Registrar:\nRegistrar: Example Registrar LLC\n";
        assert_eq!(
            field_values(response, &["Registrar"]),
            vec!["Example Registrar LLC"]
        );
    }

    #[test]
    fn referral_field_from_iana_root() {
        let response = "refer:        whois.verisign-grs.com\ndomain:       COM\n";
        assert_eq!(
            field_values(response, &["refer", "whois"]),
            vec!["whois.verisign-grs.com"]
        );
    }

    #[test]
    fn registrable_domain_strips_subdomains() {
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("a.b.example.com"), "example.com");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("localhost"), "localhost");
    }
}
