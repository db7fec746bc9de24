//! Text-generation tools and the single-flight request session that drives them.
//!
//! The backend is reached through [`TextGenerator`]; [`Session`] owns the
//! request state and turns every backend failure into [`FAILURE_MESSAGE`].

#[cfg(feature = "gemini")]
mod gemini;
mod session;
mod tool;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
pub use session::{FAILURE_MESSAGE, RequestState, Session, SessionError, ToolOutput};
pub use tool::{GHERKIN_SECTION, Tool, UnknownTool};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub temperature: f32,
}

impl GenerateOptions {
    pub fn for_tool(tool: Tool) -> Self {
        Self {
            temperature: tool.temperature(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API key is missing")]
    MissingApiKey,
    #[cfg(feature = "gemini")]
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The external text-generation collaborator.
pub trait TextGenerator {
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, GenerationError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str, &GenerateOptions) -> Result<String, GenerationError>,
{
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, GenerationError> {
        self(prompt, options)
    }
}
