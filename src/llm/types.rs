use std::path::Path;

use base64::Engine as _;

use super::LlmError;

/// A base64-encoded image plus the MIME type needed to build a data URI
/// for OpenAI-style multimodal messages.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub base64: String,
    pub mime: String,
}

impl ImageAttachment {
    pub fn new(base64: String, mime: String) -> Self {
        Self { base64, mime }
    }

    /// Read and encode an image file. MIME is guessed from the extension,
    /// falling back to JPEG for unrecognized paths.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("image/jpeg")
            .to_string();
        Ok(Self {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime,
        })
    }

    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime: mime.to_string(),
        }
    }

    /// `data:<mime>;base64,<payload>` for image_url message parts.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }

    pub fn is_empty(&self) -> bool {
        self.base64.trim().is_empty()
    }
}

/// Model client abstraction (allows mocking).
///
/// One text operation and one vision operation; everything else the
/// pipeline does is prompt construction and response parsing.
pub trait LlmClient {
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    fn generate_with_image(
        &self,
        prompt: &str,
        system: Option<&str>,
        image: &ImageAttachment,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_embeds_mime_and_payload() {
        let image = ImageAttachment::from_bytes(b"fake image bytes", "image/png");
        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(!image.is_empty());
    }

    #[test]
    fn empty_attachment_detected() {
        let image = ImageAttachment::new("   ".into(), "image/jpeg".into());
        assert!(image.is_empty());
    }

    #[test]
    fn from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let image = ImageAttachment::from_path(&path).unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(!image.base64.is_empty());
    }

    #[test]
    fn from_path_defaults_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.unknownext");
        std::fs::write(&path, b"bytes").unwrap();

        let image = ImageAttachment::from_path(&path).unwrap();
        assert_eq!(image.mime, "image/jpeg");
    }

    #[test]
    fn from_path_missing_file_errors() {
        let result = ImageAttachment::from_path(Path::new("/nonexistent/diagram.png"));
        assert!(result.is_err());
    }
}
