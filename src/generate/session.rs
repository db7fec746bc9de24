use crate::ir::ParsedDocument;
use crate::parser::{extract_diagram_blocks, extract_section, parse_document, strip_diagram_blocks};

use super::{GHERKIN_SECTION, GenerateOptions, GenerationError, TextGenerator, Tool};

/// Fixed user-facing text for any backend failure.
pub const FAILURE_MESSAGE: &str = "Error: request failed. Verify GEMINI_API_KEY.";

#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub tool: Tool,
    pub text: String,
}

impl ToolOutput {
    /// The `### GHERKIN SCENARIOS` body, for tools that produce one.
    pub fn gherkin_source(&self) -> Option<String> {
        if !self.tool.visualizes_gherkin() {
            return None;
        }
        extract_section(&self.text, GHERKIN_SECTION)
    }

    pub fn document(&self) -> Option<ParsedDocument> {
        self.gherkin_source().map(|source| parse_document(&source))
    }

    /// First fenced diagram block, for tools that emit one.
    pub fn diagram_source(&self) -> Option<String> {
        if !self.tool.emits_diagram() {
            return None;
        }
        extract_diagram_blocks(&self.text)
            .into_iter()
            .next()
            .map(|block| block.trim().to_string())
    }

    /// The output with diagram blocks removed.
    pub fn prose(&self) -> String {
        strip_diagram_blocks(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending {
        tool: Tool,
    },
    Done(ToolOutput),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a request is already in flight")]
    Busy,
    #[error("no request is in flight")]
    NotPending,
    #[error("input is empty")]
    EmptyInput,
}

/// Request state for one UI session: at most one request in flight.
#[derive(Debug, Default)]
pub struct Session {
    state: RequestState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending { .. })
    }

    /// Marks a request as started and returns the prompt to send.
    pub fn begin(&mut self, tool: Tool, input: &str) -> Result<(String, GenerateOptions), SessionError> {
        if self.is_pending() {
            return Err(SessionError::Busy);
        }
        if input.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.state = RequestState::Pending { tool };
        Ok((tool.prompt(input), GenerateOptions::for_tool(tool)))
    }

    pub fn finish(
        &mut self,
        result: Result<String, GenerationError>,
    ) -> Result<&RequestState, SessionError> {
        let RequestState::Pending { tool } = self.state else {
            return Err(SessionError::NotPending);
        };
        self.state = match result {
            Ok(text) if text.trim().is_empty() => RequestState::Done(ToolOutput {
                tool,
                text: tool.empty_response_text().to_string(),
            }),
            Ok(text) => RequestState::Done(ToolOutput { tool, text }),
            Err(err) => {
                tracing::warn!(%tool, error = %err, "generation request failed");
                RequestState::Failed(FAILURE_MESSAGE.to_string())
            }
        };
        Ok(&self.state)
    }

    pub fn run(
        &mut self,
        generator: &dyn TextGenerator,
        tool: Tool,
        input: &str,
    ) -> Result<&RequestState, SessionError> {
        let (prompt, options) = self.begin(tool, input)?;
        let result = generator.generate(&prompt, &options);
        self.finish(result)
    }

    /// Like [`Session::run`], for a backend that may have failed to initialise.
    /// That failure settles the request the same way a failed call does.
    pub fn run_with<G: TextGenerator>(
        &mut self,
        generator: Result<G, GenerationError>,
        tool: Tool,
        input: &str,
    ) -> Result<&RequestState, SessionError> {
        match generator {
            Ok(generator) => self.run(&generator, tool, input),
            Err(err) => {
                self.begin(tool, input)?;
                self.finish(Err(err))
            }
        }
    }

    /// Text to show in the output pane, if any.
    pub fn display_text(&self) -> Option<&str> {
        match &self.state {
            RequestState::Done(output) => Some(output.text.as_str()),
            RequestState::Failed(message) => Some(message.as_str()),
            RequestState::Idle | RequestState::Pending { .. } => None,
        }
    }

    pub fn reset(&mut self) {
        if !self.is_pending() {
            self.state = RequestState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUEPRINT: &str = "### GHERKIN SCENARIOS\nFeature: Vault Safety\nScenario: Deposit limits\nGiven a vault\nWhen user deposits over cap\nThen transaction reverts\n### TEST HARNESS BLUEPRINT\ncontract VaultTest {}";

    fn echo(text: &'static str) -> impl Fn(&str, &GenerateOptions) -> Result<String, GenerationError> {
        move |_, _| Ok(text.to_string())
    }

    #[test]
    fn run_stores_output_and_parses_gherkin() {
        let mut session = Session::new();
        let state = session
            .run(&echo(BLUEPRINT), Tool::QualityBlueprint, "vault caps")
            .unwrap();
        let RequestState::Done(output) = state else {
            panic!("expected done, got {state:?}");
        };
        let doc = output.document().unwrap();
        assert_eq!(doc.title, "Vault Safety");
        assert_eq!(doc.groups[0].steps.len(), 3);
        assert!(output.diagram_source().is_none());
    }

    #[test]
    fn failures_become_fixed_message() {
        let mut session = Session::new();
        let failing = |_: &str, _: &GenerateOptions| -> Result<String, GenerationError> {
            Err(GenerationError::MissingApiKey)
        };
        let state = session.run(&failing, Tool::VulnerabilityAudit, "code").unwrap();
        assert_eq!(state, &RequestState::Failed(FAILURE_MESSAGE.to_string()));
        assert_eq!(session.display_text(), Some(FAILURE_MESSAGE));
        assert!(!session.is_pending());
    }

    #[test]
    fn second_request_is_refused_while_pending() {
        let mut session = Session::new();
        session.begin(Tool::CodeExplainer, "fn x()").unwrap();
        assert_eq!(
            session.begin(Tool::CodeExplainer, "again"),
            Err(SessionError::Busy)
        );
        session.reset();
        assert!(session.is_pending());
        session.finish(Ok("done".to_string())).unwrap();
        assert_eq!(session.display_text(), Some("done"));
        assert!(session.begin(Tool::CodeExplainer, "again").is_ok());
    }

    #[test]
    fn options_carry_tool_temperature() {
        let mut session = Session::new();
        let seen = std::cell::Cell::new(0.0f32);
        let capture = |prompt: &str, options: &GenerateOptions| -> Result<String, GenerationError> {
            assert!(prompt.contains("bridge"));
            seen.set(options.temperature);
            Ok("ok".to_string())
        };
        session.run(&capture, Tool::ArchitectureCopilot, "bridge").unwrap();
        assert_eq!(seen.get(), 0.4);
    }

    #[test]
    fn empty_completion_uses_tool_fallback() {
        let mut session = Session::new();
        session.run(&echo("  "), Tool::ArchitectureCopilot, "bridge").unwrap();
        assert_eq!(session.display_text(), Some("Design failed."));
    }

    #[test]
    fn finish_without_begin_is_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.finish(Ok("x".to_string())).unwrap_err(),
            SessionError::NotPending
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.begin(Tool::QualityBlueprint, "   ").unwrap_err(),
            SessionError::EmptyInput
        );
        assert_eq!(session.state(), &RequestState::Idle);
    }

    #[test]
    fn architecture_output_exposes_diagram_and_prose() {
        let output = ToolOutput {
            tool: Tool::ArchitectureCopilot,
            text: "### ARCHITECTURE DIAGRAM\n```mermaid\n graph TD\nA-->B\n```\n### SECURITY RATIONALE\nreasons".to_string(),
        };
        assert_eq!(output.diagram_source().as_deref(), Some("graph TD\nA-->B"));
        assert!(!output.prose().contains("A-->B"));
        assert!(output.gherkin_source().is_none());
    }

    #[test]
    fn backend_setup_failure_becomes_failed_state() {
        let mut session = Session::new();
        let setup: Result<fn(&str, &GenerateOptions) -> Result<String, GenerationError>, _> =
            Err(GenerationError::MissingApiKey);
        let state = session.run_with(setup, Tool::VulnerabilityAudit, "contract X {}").unwrap();
        assert_eq!(state, &RequestState::Failed(FAILURE_MESSAGE.to_string()));
        assert!(!session.is_pending());
        assert_eq!(session.display_text(), Some(FAILURE_MESSAGE));
    }
}
