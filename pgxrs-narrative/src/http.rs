//! Client for OpenAI-compatible `chat/completions` endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::TextGenerator;
use crate::prompt::Prompt;

pub const DEFAULT_API_KEY_ENV: &str = "PGXRS_LLM_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpGeneratorConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token, if any
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for HttpGeneratorConfig {
    fn default() -> Self {
        HttpGeneratorConfig {
            endpoint: "http://localhost:8080/v1/chat/completions".to_string(),
            model: "default".to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_tokens: 400,
            temperature: 0.2,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

pub struct HttpTextGenerator {
    client: Client,
    config: HttpGeneratorConfig,
    api_key: Option<String>,
}

impl HttpTextGenerator {
    /// Build a client; the API key is read once from `config.api_key_env`.
    pub fn new(config: HttpGeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().build()?;
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            debug!(env = config.api_key_env.as_str(), "no API key set, sending unauthenticated requests");
        }
        Ok(HttpTextGenerator {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &HttpGeneratorConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)
    }
}
