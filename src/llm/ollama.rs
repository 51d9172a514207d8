use serde::{Deserialize, Serialize};

use super::types::{ImageAttachment, LlmClient};
use super::LlmError;
use crate::config::DEFAULT_TEMPERATURE;

/// Ollama HTTP client for local multimodal inference.
///
/// Text goes through `/api/generate`; vision calls use `/api/chat`, which
/// chat-template vision models (LLaVA, Gemma) require. `/api/generate`
/// returns 500 for those models when images are attached.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local(model: &str) -> Self {
        Self::new("http://localhost:11434", model, 300)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// List model names known to the Ollama daemon.
    pub fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    pub fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            LlmError::HttpClient(e.to_string())
        }
    }

    fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Request body for Ollama `/api/generate`.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerationOptions,
}

/// Request body for Ollama `/api/chat` (vision).
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: GenerationOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    /// Base64-encoded images (only for user messages).
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<&'a str>>,
}

#[derive(Serialize)]
struct GenerationOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerationOptions {
                temperature: DEFAULT_TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response)?;

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn generate_with_image(
        &self,
        prompt: &str,
        system: Option<&str>,
        image: &ImageAttachment,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
                images: None,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
            images: Some(vec![image.base64.as_str()]),
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: GenerationOptions {
                temperature: DEFAULT_TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response)?;

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.message.content)
    }
}
