mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};

use client::GroqClient;

/// Sampling temperature for classification calls: near-deterministic.
const JSON_TEMPERATURE: f32 = 0.1;

// =============================================================================
// Groq Agent
// =============================================================================

#[derive(Clone)]
pub struct Groq {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl Groq {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow!("GROQ_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> GroqClient {
        let client = GroqClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Run a single system-instruction completion in native JSON mode.
    ///
    /// Returns the raw text of the first choice; the caller owns parsing.
    pub async fn json_completion(&self, system: impl Into<String>) -> Result<String> {
        let request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .temperature(JSON_TEMPERATURE)
            .response_format(types::ResponseFormat::json_object());

        let response = self.client().chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from Groq"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_new() {
        let ai = Groq::new("gsk-test", "llama-3.3-70b-versatile");
        assert_eq!(ai.model(), "llama-3.3-70b-versatile");
        assert_eq!(ai.api_key, "gsk-test");
        assert!(ai.base_url.is_none());
    }

    #[test]
    fn test_groq_with_base_url() {
        let ai = Groq::new("gsk-test", "llama-3.3-70b-versatile")
            .with_base_url("http://127.0.0.1:9999");
        assert_eq!(ai.base_url, Some("http://127.0.0.1:9999".to_string()));
    }
}
