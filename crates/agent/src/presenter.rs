//! Streaming presenter — renders a turn's event sequence as terminal text.
//!
//! A pure read-side projection: events in, output fragments out, no effect
//! on conversation state. Tool results are suppressed here — they already
//! flow back to the model as conversation content, and echoing them would
//! duplicate the invoker's records.

use crate::stream_event::AgentStreamEvent;
use scout_core::provider::FinishReason;

const BLUE: &str = "\x1b[94m";
const DIM: &str = "\x1b[90m";
const GREEN_BOLD: &str = "\x1b[1;32m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// Renders one turn's events into an interleaved output stream.
///
/// Create a fresh renderer per turn: the `[AI]:` prefix is emitted once
/// before the first text fragment of the turn, and tool-marker state
/// tracks call indices within it.
pub struct TurnRenderer {
    color: bool,
    last_index: Option<usize>,
    first_text: bool,
}

impl TurnRenderer {
    /// Renderer with ANSI colors for terminal output.
    pub fn new() -> Self {
        Self {
            color: true,
            last_index: None,
            first_text: true,
        }
    }

    /// Renderer without ANSI codes (tests, non-tty output).
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::new()
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Render one event. Returns `None` for events with no visible output.
    pub fn render(&mut self, event: &AgentStreamEvent) -> Option<String> {
        match event {
            AgentStreamEvent::ToolCallStarted { index, name } => {
                // One-time marker per call index
                if self.last_index == Some(*index) {
                    return None;
                }
                self.last_index = Some(*index);
                Some(format!(
                    "\n{}\n",
                    self.paint(BLUE, &format!("🛠  Executing Tool: {name}"))
                ))
            }
            AgentStreamEvent::ToolCallArgsDelta { fragment, .. } => {
                Some(self.paint(DIM, fragment))
            }
            AgentStreamEvent::TextDelta { content } => {
                let mut out = String::new();
                if self.first_text {
                    self.first_text = false;
                    out.push('\n');
                    out.push_str(&self.paint(GREEN_BOLD, "[AI]:"));
                    out.push(' ');
                }
                out.push_str(content);
                Some(out)
            }
            AgentStreamEvent::ModelFinished { reason } => {
                if *reason == FinishReason::ToolCalls {
                    self.last_index = None;
                    Some("\n".into())
                } else {
                    None
                }
            }
            // Redundant with the invoker's own records
            AgentStreamEvent::ToolResult { .. } => None,
            AgentStreamEvent::Done { .. } => None,
            AgentStreamEvent::Error { message } => Some(format!(
                "\n{}\n",
                self.paint(RED, &format!("Fatal error: {message}"))
            )),
        }
    }
}

impl Default for TurnRenderer {
    fn default() -> Self {
        Self::new()
    }
}
