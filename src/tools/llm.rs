use rig::completion::{Prompt, PromptError};
use rig::prelude::*;
use rig::providers::openai;

use crate::config::LlmSettings;
use crate::error::ConfigError;

type LLMAgent = rig::agent::Agent<openai::CompletionModel>;

/// Shared OpenAI client; every call builds a fresh agent with its own preamble.
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
    model: String,
    temperature: f64,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey("OPENAI_API_KEY"))?;

        Ok(Self {
            client: openai::Client::new(api_key),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn agent(&self, preamble: &str, max_tokens: Option<u64>) -> LLMAgent {
        let builder = self
            .client
            .agent(&self.model)
            .preamble(preamble)
            .temperature(self.temperature);
        match max_tokens {
            Some(limit) => builder.max_tokens(limit).build(),
            None => builder.build(),
        }
    }

    /// Run one prompt and return the trimmed completion, `None` when it is empty.
    pub async fn complete(
        &self,
        preamble: &str,
        prompt: String,
        max_tokens: Option<u64>,
    ) -> Result<Option<String>, PromptError> {
        let agent = self.agent(preamble, max_tokens);
        let response = agent.prompt(&prompt).await?;
        let trimmed = response.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }
}
