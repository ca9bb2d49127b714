//! Consecutive-tool-failure accounting and the circuit breaker.
//!
//! A runaway model can keep issuing tool calls that fail the same way,
//! burning the whole step budget before anyone intervenes. The breaker
//! counts consecutive failed tool results — across bursts, until a success
//! or a fresh human turn — and halts model consultation at the threshold.

use scout_core::message::{Message, Role};
use scout_core::tool::ERROR_MARKER;

/// How many accumulated tool failures trip the breaker.
pub const MAX_CONSECUTIVE_TOOL_FAILURES: u32 = 5;

/// The fixed terminal message emitted when the breaker trips.
pub const BREAKER_MESSAGE: &str = "Multiple consecutive tool calls have failed, so I've \
stopped to avoid repeating the same error. Please review the tool errors above and adjust \
the request before we continue.";

/// Count failed tool results in the current burst.
///
/// Scans backward from the most recent message, counting tool messages
/// whose content carries the error marker, and stops at the message that
/// started the burst: an assistant message that issued tool calls, or a
/// human message. Successful tool results are passed over without ending
/// the scan.
pub fn burst_failures(messages: &[Message]) -> u32 {
    let mut failures = 0;
    for message in messages.iter().rev() {
        match message.role {
            Role::Tool => {
                if message.content.starts_with(ERROR_MARKER) {
                    failures += 1;
                }
            }
            Role::Assistant if !message.tool_calls.is_empty() => break,
            Role::User => break,
            _ => {}
        }
    }
    failures
}

/// Compute the running failure count after the latest burst.
///
/// New failures accumulate onto the previous count. With no new failures,
/// a successful tool result as the most recent message resets the count —
/// and only then; forgiveness is last-message-wins, an interleaved success
/// earlier in a failing burst does not reset.
pub fn next_error_count(messages: &[Message], previous: u32) -> u32 {
    let new_failures = burst_failures(messages);
    if new_failures > 0 {
        previous + new_failures
    } else if matches!(messages.last(), Some(m) if m.role == Role::Tool) {
        0
    } else {
        previous
    }
}

/// Whether the running count has reached the breaker threshold.
pub fn breaker_tripped(error_count: u32) -> bool {
    error_count >= MAX_CONSECUTIVE_TOOL_FAILURES
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::message::MessageToolCall;

    fn tool_call_request(n: usize) -> Message {
        let calls = (0..n)
            .map(|i| MessageToolCall {
                id: format!("call_{i}"),
                name: "read_file".into(),
                arguments: "{}".into(),
            })
            .collect();
        Message::assistant_with_tool_calls("", calls)
    }

    fn failed(i: usize) -> Message {
        Message::tool_result(format!("call_{i}"), "read_file", "Error: no such file")
    }

    fn succeeded(i: usize) -> Message {
        Message::tool_result(format!("call_{i}"), "read_file", "contents")
    }

    #[test]
    fn counts_failures_in_burst() {
        let messages = vec![
            Message::user("go"),
            tool_call_request(3),
            failed(0),
            failed(1),
            failed(2),
        ];
        assert_eq!(burst_failures(&messages), 3);
    }

    #[test]
    fn scan_stops_at_burst_start() {
        // Failures from an earlier burst are behind the tool-call message
        let messages = vec![
            tool_call_request(1),
            failed(0),
            tool_call_request(2),
            failed(0),
            succeeded(1),
        ];
        assert_eq!(burst_failures(&messages), 1);
    }

    #[test]
    fn scan_stops_at_human_message() {
        let messages = vec![failed(0), Message::user("new request")];
        assert_eq!(burst_failures(&messages), 0);
    }

    #[test]
    fn success_passed_over_mid_burst() {
        // A success between failures neither stops the scan nor resets
        let messages = vec![
            tool_call_request(3),
            failed(0),
            succeeded(1),
            failed(2),
        ];
        assert_eq!(burst_failures(&messages), 2);
        assert_eq!(next_error_count(&messages, 0), 2);
    }

    #[test]
    fn failures_accumulate_across_bursts() {
        let messages = vec![tool_call_request(2), failed(0), failed(1)];
        assert_eq!(next_error_count(&messages, 3), 5);
    }

    #[test]
    fn clean_success_resets_count() {
        let messages = vec![tool_call_request(1), succeeded(0)];
        assert_eq!(next_error_count(&messages, 4), 0);
    }

    #[test]
    fn trailing_success_after_failures_does_not_reset() {
        // Last message is a success, but the burst still carries failures
        let messages = vec![tool_call_request(2), failed(0), succeeded(1)];
        assert_eq!(next_error_count(&messages, 0), 1);
    }

    #[test]
    fn no_tools_leaves_count_unchanged() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(next_error_count(&messages, 2), 2);
    }

    #[test]
    fn exact_count_equals_consecutive_failures() {
        // N failed results since the boundary => count is exactly N
        for n in 1..=6 {
            let mut messages = vec![Message::user("go"), tool_call_request(n)];
            for i in 0..n {
                messages.push(failed(i));
            }
            assert_eq!(next_error_count(&messages, 0), n as u32);
        }
    }

    #[test]
    fn threshold_is_five() {
        assert!(!breaker_tripped(4));
        assert!(breaker_tripped(5));
        assert!(breaker_tripped(6));
    }
}
