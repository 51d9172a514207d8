//! Test doubles for the model boundary, shared by unit tests across the
//! pipeline modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::{ImageAttachment, LlmClient};
use super::LlmError;

/// Mock client returning one fixed response for every call.
pub struct MockLlmClient {
    response: String,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }

    fn generate_with_image(
        &self,
        _prompt: &str,
        _system: Option<&str>,
        _image: &ImageAttachment,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Mock client that plays back a scripted response per call, in order.
/// Calls past the end of the script repeat the final response. Prompts
/// are recorded for assertions.
pub struct SequenceLlmClient {
    responses: Vec<String>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl SequenceLlmClient {
    pub fn new(responses: Vec<String>) -> Self {
        assert!(!responses.is_empty(), "script must have at least one response");
        Self {
            responses,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.responses[i.min(self.responses.len() - 1)].clone()
    }
}

impl LlmClient for SequenceLlmClient {
    fn generate(&self, prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        Ok(self.next_response(prompt))
    }

    fn generate_with_image(
        &self,
        prompt: &str,
        _system: Option<&str>,
        _image: &ImageAttachment,
    ) -> Result<String, LlmError> {
        Ok(self.next_response(prompt))
    }
}

/// Mock client whose every call fails, for failure-containment tests.
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl LlmClient for FailingLlmClient {
    fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        Err(LlmError::HttpClient(self.message.clone()))
    }

    fn generate_with_image(
        &self,
        _prompt: &str,
        _system: Option<&str>,
        _image: &ImageAttachment,
    ) -> Result<String, LlmError> {
        Err(LlmError::HttpClient(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let client = MockLlmClient::new("canned");
        assert_eq!(client.generate("p", None).unwrap(), "canned");
        let image = ImageAttachment::new("aGk=".into(), "image/png".into());
        assert_eq!(client.generate_with_image("p", None, &image).unwrap(), "canned");
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn sequence_plays_back_in_order_then_repeats_last() {
        let client = SequenceLlmClient::new(vec!["one".into(), "two".into()]);
        assert_eq!(client.generate("a", None).unwrap(), "one");
        assert_eq!(client.generate("b", None).unwrap(), "two");
        assert_eq!(client.generate("c", None).unwrap(), "two");
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn failing_client_always_errors() {
        let client = FailingLlmClient::new("boom");
        assert!(matches!(
            client.generate("p", None),
            Err(LlmError::HttpClient(m)) if m == "boom"
        ));
    }
}
