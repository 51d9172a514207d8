use serde::{Deserialize, Serialize};

use super::types::{ImageAttachment, LlmClient};
use super::LlmError;
use crate::config::DEFAULT_TEMPERATURE;

/// Azure OpenAI API version the deployment is called with.
const API_VERSION: &str = "2024-08-01-preview";

/// Azure OpenAI chat-completions client.
///
/// Multimodal content goes through the `content` parts array with
/// `image_url` data URIs, the same wire shape GPT-4o deployments expect.
pub struct AzureOpenAiClient {
    endpoint: String,
    deployment: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl AzureOpenAiClient {
    pub fn new(endpoint: &str, deployment: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, API_VERSION
        )
    }

    fn send(&self, body: &ChatCompletionsRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    LlmError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
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

        let parsed: ChatCompletionsResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::ResponseParsing("Empty choices in completion".into()))
    }
}

#[derive(Serialize)]
struct ChatCompletionsRequest {
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

fn build_messages(
    prompt: &str,
    system: Option<&str>,
    image: Option<&ImageAttachment>,
) -> Vec<Message> {
    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(Message {
            role: "system",
            content: vec![ContentPart::Text {
                text: system.to_string(),
            }],
        });
    }

    let mut content = vec![ContentPart::Text {
        text: prompt.to_string(),
    }];
    if let Some(image) = image {
        content.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.data_uri(),
            },
        });
    }
    messages.push(Message {
        role: "user",
        content,
    });
    messages
}

impl LlmClient for AzureOpenAiClient {
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let body = ChatCompletionsRequest {
            messages: build_messages(prompt, system, None),
            temperature: DEFAULT_TEMPERATURE,
        };
        self.send(&body)
    }

    fn generate_with_image(
        &self,
        prompt: &str,
        system: Option<&str>,
        image: &ImageAttachment,
    ) -> Result<String, LlmError> {
        let body = ChatCompletionsRequest {
            messages: build_messages(prompt, system, Some(image)),
            temperature: DEFAULT_TEMPERATURE,
        };
        self.send(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_includes_deployment_and_api_version() {
        let client = AzureOpenAiClient::new(
            "https://example.openai.azure.com/",
            "gpt-4o",
            "secret",
            120,
        );
        let url = client.completions_url();
        assert_eq!(
            url,
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-08-01-preview"
        );
    }

    #[test]
    fn messages_carry_image_url_data_uri() {
        let image = ImageAttachment::new("aGVsbG8=".into(), "image/png".into());
        let messages = build_messages("describe this", Some("you are an architect"), Some(&image));
        let json = serde_json::to_string(&messages).unwrap();
        assert!(json.contains("\"type\":\"image_url\""));
        assert!(json.contains("data:image/png;base64,aGVsbG8="));
        assert!(json.contains("\"role\":\"system\""));
    }

    #[test]
    fn text_only_messages_have_no_image_part() {
        let messages = build_messages("estimate cost", None, None);
        let json = serde_json::to_string(&messages).unwrap();
        assert!(!json.contains("image_url"));
        assert_eq!(messages.len(), 1);
    }
}
