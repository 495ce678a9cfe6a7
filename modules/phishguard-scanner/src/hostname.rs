use phishguard_common::ScanError;

/// Extract the network-addressable hostname from a raw URL string.
///
/// Bare domains are accepted: input without an `http` scheme prefix is
/// parsed as `http://<input>`. This is the only validation that runs before
/// any network activity.
pub fn host_from_url(raw: &str) -> Result<String, ScanError> {
    let raw = raw.trim();
    let candidate = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let parsed = url::Url::parse(&candidate)
        .map_err(|_| ScanError::InvalidUrl(format!("Could not parse URL: {raw}")))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(ScanError::InvalidUrl(format!("URL has no hostname: {raw}"))),
    }
}
