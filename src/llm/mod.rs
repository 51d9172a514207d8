pub mod azure;
pub mod mock;
pub mod ollama;
pub mod types;

pub use azure::*;
pub use mock::*;
pub use ollama::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Model backend is not reachable at {0}")]
    Connection(String),

    #[error("Model backend returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
