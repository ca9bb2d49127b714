//! Tool invocation — executes a burst of requested tool calls.
//!
//! Every per-tool failure is absorbed here and turned into ordinary
//! conversation content carrying the error marker, so the model can see
//! and react to it. Nothing a tool does propagates out of this module.

use crate::normalize::normalize_tool_args;
use chrono::Utc;
use scout_core::event::{DomainEvent, EventBus};
use scout_core::message::{Message, MessageToolCall};
use scout_core::tool::{ToolRegistry, ToolResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes the tool calls of one assistant message, in request order.
pub struct ToolInvoker {
    tools: Arc<ToolRegistry>,
    event_bus: Arc<EventBus>,
}

impl ToolInvoker {
    pub fn new(tools: Arc<ToolRegistry>, event_bus: Arc<EventBus>) -> Self {
        Self { tools, event_bus }
    }

    /// Execute every tool call the message carries, sequentially.
    ///
    /// Output order equals request order, so correlation by position and
    /// by `tool_call_id` are both unambiguous. An assistant message with
    /// no tool calls yields an empty sequence.
    pub async fn invoke_all(&self, message: &Message) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(message.tool_calls.len());
        for call in &message.tool_calls {
            let start = std::time::Instant::now();
            let result = self.invoke_one(call).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            debug!(
                tool = %call.name,
                ok = result.ok,
                duration_ms,
                "Tool call finished"
            );
            self.event_bus.publish(DomainEvent::ToolExecuted {
                tool_name: call.name.clone(),
                success: result.ok,
                duration_ms,
                timestamp: Utc::now(),
            });

            results.push(result);
        }
        results
    }

    async fn invoke_one(&self, call: &MessageToolCall) -> ToolResult {
        let args: serde_json::Value = serde_json::from_str(&call.arguments).unwrap_or_default();
        let args = normalize_tool_args(&call.name, args);

        let Some(tool) = self.tools.get(&call.name) else {
            warn!(tool = %call.name, "Requested tool is not registered");
            return ToolResult::from_content(
                &call.id,
                &call.name,
                format!("Error: tool not found: {}", call.name),
            );
        };

        match tool.invoke(args).await {
            Ok(value) => ToolResult::from_content(&call.id, &call.name, coerce_text(value)),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                ToolResult::from_content(&call.id, &call.name, format!("Error: {e}"))
            }
        }
    }
}

/// Coerce a tool's native return shape to text.
fn coerce_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::error::ToolError;
    use scout_core::tool::Tool;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the 'text' argument"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn invoke(
            &self,
            arguments: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(arguments["text"].clone())
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }
        async fn invoke(
            &self,
            _arguments: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Err(ToolError::ExecutionFailed {
                tool_name: "failing".into(),
                reason: "permission denied".into(),
            })
        }
    }

    fn invoker() -> ToolInvoker {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(FailingTool));
        ToolInvoker::new(Arc::new(registry), Arc::new(EventBus::default()))
    }

    fn call(id: &str, name: &str, arguments: &str) -> MessageToolCall {
        MessageToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    #[tokio::test]
    async fn no_tool_calls_yields_empty_sequence() {
        let results = invoker().invoke_all(&Message::assistant("done")).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn results_preserve_request_order() {
        let message = Message::assistant_with_tool_calls(
            "",
            vec![
                call("call_a", "echo", r#"{"text":"A"}"#),
                call("call_b", "failing", "{}"),
                call("call_c", "echo", r#"{"text":"C"}"#),
            ],
        );

        let results = invoker().invoke_all(&message).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].tool_call_id, "call_a");
        assert_eq!(results[1].tool_call_id, "call_b");
        assert_eq!(results[2].tool_call_id, "call_c");
        assert!(results[0].ok);
        assert!(!results[1].ok);
        assert!(results[2].ok);
    }

    #[tokio::test]
    async fn unresolved_tool_synthesizes_error_result() {
        let message = Message::assistant_with_tool_calls(
            "",
            vec![call("call_1", "no_such_tool", "{}")],
        );

        let results = invoker().invoke_all(&message).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].ok);
        assert!(results[0].content.starts_with("Error:"));
        assert!(results[0].content.contains("no_such_tool"));
    }

    #[tokio::test]
    async fn execution_failure_becomes_error_content() {
        let message =
            Message::assistant_with_tool_calls("", vec![call("call_1", "failing", "{}")]);

        let results = invoker().invoke_all(&message).await;
        assert!(!results[0].ok);
        assert!(results[0].content.starts_with("Error:"));
        assert!(results[0].content.contains("permission denied"));
    }

    #[tokio::test]
    async fn malformed_arguments_absorbed_as_failure() {
        // Unparseable argument JSON reaches the tool as null, which echoes
        // back as JSON null text rather than crashing the invoker
        let message =
            Message::assistant_with_tool_calls("", vec![call("call_1", "echo", "not json")]);

        let results = invoker().invoke_all(&message).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "null");
    }

    #[tokio::test]
    async fn structured_output_coerced_to_text() {
        let message = Message::assistant_with_tool_calls(
            "",
            vec![call("call_1", "echo", r#"{"text":{"k":1}}"#)],
        );

        let results = invoker().invoke_all(&message).await;
        assert_eq!(results[0].content, r#"{"k":1}"#);
    }

    #[tokio::test]
    async fn publishes_tool_executed_events() {
        let inv = invoker();
        let mut rx = inv.event_bus.subscribe();

        let message =
            Message::assistant_with_tool_calls("", vec![call("call_1", "failing", "{}")]);
        inv.invoke_all(&message).await;

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::ToolExecuted {
                tool_name, success, ..
            } => {
                assert_eq!(tool_name, "failing");
                assert!(!success);
            }
            _ => panic!("Expected ToolExecuted event"),
        }
    }
}
