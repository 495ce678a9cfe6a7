use std::sync::Arc;

use tracing::{debug, info};

use ai_client::util::strip_code_blocks;
use phishguard_common::{ScanError, Verdict};

use crate::traits::ReasoningAgent;
use crate::truth::Probes;
use crate::{hostname, prompt, truth};

/// The analysis entry point: URL in, structured verdict out.
///
/// Owns its collaborators by injection; nothing here touches process-wide
/// state, so concurrent requests share nothing but the probe handles.
pub struct Analyzer {
    probes: Probes,
    agent: Arc<dyn ReasoningAgent>,
}

impl Analyzer {
    pub fn new(probes: Probes, agent: Arc<dyn ReasoningAgent>) -> Self {
        Self { probes, agent }
    }

    /// Run the full pipeline: hostname → technical truth → reasoning →
    /// parsed verdict.
    ///
    /// Individual signal failures never surface here; only an unusable URL
    /// or a failed/unparseable reasoning step returns an error.
    pub async fn analyze(&self, url: &str) -> Result<Verdict, ScanError> {
        let hostname = hostname::host_from_url(url)?;
        info!(url, hostname, "Analyzing URL");

        let truth = truth::assemble(&self.probes, url, &hostname).await;
        debug!(?truth, "Technical truth assembled");

        let request = prompt::build_verdict_request(&truth);

        let response = self
            .agent
            .classify(&request)
            .await
            .map_err(|e| ScanError::Analysis(e.to_string()))?;

        let verdict: Verdict = serde_json::from_str(strip_code_blocks(&response))
            .map_err(|e| ScanError::Analysis(format!("Malformed verdict payload: {e}")))?;

        // The model is asked for 0-100 but nothing upstream enforces it.
        if verdict.threat_assessment.score > 100 {
            return Err(ScanError::Analysis(format!(
                "Verdict score {} out of range",
                verdict.threat_assessment.score
            )));
        }

        Ok(verdict)
    }
}
