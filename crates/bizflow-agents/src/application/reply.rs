//! Event prompts and interpretation of completion text.

use bizflow_core::error::DomainError;
use bizflow_core::event::Event;
use serde::Deserialize;

use crate::domain::response::{AgentResponse, ResponseMode, SuggestedAction};

const REPLY_FORMAT: &str = r#"Respond with a single JSON object of the form {"analysis": string, "suggestedActions": [{"type": string, "description": string, "priority": "low" | "medium" | "high", "autoExecute": boolean}], "insights": [string]}."#;

/// The shape agents are asked to reply in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredReply {
    analysis: String,
    #[serde(default)]
    suggested_actions: Vec<SuggestedAction>,
    #[serde(default)]
    insights: Vec<String>,
}

/// Builds the user message describing `event`: type, timestamp, source and
/// the full payload as pretty-printed JSON.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the payload cannot be
/// serialized.
pub fn describe_event(event: &Event) -> Result<String, DomainError> {
    let payload = serde_json::to_string_pretty(&event.payload)
        .map_err(|err| DomainError::Infrastructure(format!("serializing event payload: {err}")))?;

    Ok(format!(
        "A business event just occurred.\n\n\
         Event type: {}\n\
         Timestamp: {}\n\
         Source: {}\n\
         Payload:\n{payload}\n\n\
         {REPLY_FORMAT}",
        event.event_type(),
        event.timestamp.to_rfc3339(),
        event.source,
    ))
}

/// Interprets completion text as a structured reply, falling back to the
/// exact text as the analysis with no actions or insights.
#[must_use]
pub fn interpret(agent_id: &str, text: &str) -> AgentResponse {
    match parse_structured(text) {
        Some(reply) => AgentResponse {
            agent_id: agent_id.to_owned(),
            analysis: reply.analysis,
            suggested_actions: reply.suggested_actions,
            insights: reply.insights,
            mode: ResponseMode::Structured,
        },
        None => AgentResponse::raw_text(agent_id, text),
    }
}

fn parse_structured(text: &str) -> Option<StructuredReply> {
    let trimmed = text.trim();
    serde_json::from_str(trimmed)
        .ok()
        .or_else(|| fenced_body(trimmed).and_then(|body| serde_json::from_str(body).ok()))
}

/// Body of the first Markdown code fence in `text`, language tag dropped.
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body = &after_open[after_open.find('\n')? + 1..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use bizflow_core::catalogue::EventPayload;
    use bizflow_core::payload::InvoicePayload;
    use bizflow_test_support::fixed_now;
    use uuid::Uuid;

    use crate::domain::response::ActionPriority;

    fn invoice_paid() -> Event {
        let id = Uuid::new_v4();
        Event {
            id,
            timestamp: fixed_now(),
            source: "billing".into(),
            user_id: None,
            tenant_id: None,
            payload: EventPayload::InvoicePaid(InvoicePayload {
                invoice_id: Uuid::new_v4(),
                client_id: Uuid::new_v4(),
                quote_id: None,
                amount_cents: 12_345,
                currency: "USD".into(),
                due_date: None,
            }),
            metadata: BTreeMap::new(),
            correlation_id: id,
            causation_id: None,
            cascade_depth: 0,
        }
    }

    #[test]
    fn test_description_contains_event_details() {
        let event = invoice_paid();

        let description = describe_event(&event).unwrap();

        assert!(description.contains("Event type: finance.invoice.paid"));
        assert!(description.contains("Timestamp: 2026-01-15T10:00:00+00:00"));
        assert!(description.contains("Source: billing"));
        assert!(description.contains("\"amount_cents\": 12345"));
        assert!(description.contains("suggestedActions"));
    }

    #[test]
    fn test_bare_json_reply_is_structured() {
        let text = r#"{
            "analysis": "Invoice settled early.",
            "suggestedActions": [
                {"type": "thank_client", "description": "Send a thank-you note", "priority": "low", "autoExecute": true}
            ],
            "insights": ["Client pays ahead of terms"]
        }"#;

        let response = interpret("finance", text);

        assert_eq!(response.mode, ResponseMode::Structured);
        assert_eq!(response.agent_id, "finance");
        assert_eq!(response.analysis, "Invoice settled early.");
        assert_eq!(response.suggested_actions.len(), 1);
        assert_eq!(response.suggested_actions[0].action_type, "thank_client");
        assert_eq!(response.suggested_actions[0].priority, ActionPriority::Low);
        assert!(response.suggested_actions[0].auto_execute);
        assert_eq!(response.insights, vec!["Client pays ahead of terms"]);
    }

    #[test]
    fn test_fenced_json_reply_is_structured() {
        let text = "Here is my analysis:\n```json\n{\"analysis\": \"Looks healthy.\"}\n```\n";

        let response = interpret("finance", text);

        assert_eq!(response.mode, ResponseMode::Structured);
        assert_eq!(response.analysis, "Looks healthy.");
        assert!(response.suggested_actions.is_empty());
        assert!(response.insights.is_empty());
    }

    #[test]
    fn test_plain_text_falls_back_verbatim() {
        let text = "  The invoice was paid on time; nothing to do.\n";

        let response = interpret("finance", text);

        assert_eq!(response.mode, ResponseMode::RawText);
        assert_eq!(response.analysis, text);
        assert!(response.suggested_actions.is_empty());
        assert!(response.insights.is_empty());
    }

    #[test]
    fn test_json_without_analysis_falls_back() {
        let text = r#"{"insights": ["no analysis field"]}"#;

        let response = interpret("finance", text);

        assert_eq!(response.mode, ResponseMode::RawText);
        assert_eq!(response.analysis, text);
    }

    #[test]
    fn test_unknown_priority_falls_back() {
        let text = r#"{"analysis": "x", "suggestedActions": [{"type": "t", "description": "d", "priority": "urgent"}]}"#;

        let response = interpret("sales", text);

        assert_eq!(response.mode, ResponseMode::RawText);
    }

    #[test]
    fn test_unterminated_fence_falls_back() {
        let text = "```json\n{\"analysis\": \"cut off\"";

        let response = interpret("sales", text);

        assert_eq!(response.mode, ResponseMode::RawText);
        assert_eq!(response.analysis, text);
    }
}
