use eventsource_stream::Eventsource;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    chat::{
        models::{ChatReply, ChatRequest, ChatRole, ChatStreamEvent},
        prompt::FALLBACK_MESSAGE,
        ChatError,
    },
    config::ChatConfig,
    metrics,
    models::gemini::{
        Content, GenerateContentRequest, GenerateContentResponse, Part, SystemInstruction,
    },
    providers::gemini,
};

/// Forwards chat turns to Gemini
#[derive(Clone)]
pub struct ChatRelay {
    client: Client,
    config: ChatConfig,
}

impl ChatRelay {
    pub fn new(client: Client, config: ChatConfig) -> Self {
        Self { client, config }
    }

    /// Trimmed user message, or why it cannot be sent
    pub fn validate(&self, request: &ChatRequest) -> Result<String, ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }

        let message = request.message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let length = message.chars().count();
        if length > self.config.max_message_chars {
            return Err(ChatError::MessageTooLong {
                length,
                max: self.config.max_message_chars,
            });
        }

        Ok(message.to_string())
    }

    /// Build the upstream request from the transcript and the new message
    ///
    /// Gemini conversations must open with a user turn and alternate roles.
    /// Assistant turns before the first user turn (the greeting) are dropped,
    /// both before and after the history is cut to `max_history_turns`.
    /// User turns left unanswered at the end of the history are dropped so
    /// the new message does not follow another user turn.
    pub fn build_request(&self, request: &ChatRequest, message: &str) -> GenerateContentRequest {
        let mut turns: Vec<_> = request
            .history
            .iter()
            .filter(|turn| !turn.content.trim().is_empty())
            .skip_while(|turn| turn.role == ChatRole::Assistant)
            .collect();
        while turns.last().is_some_and(|turn| turn.role == ChatRole::User) {
            turns.pop();
        }

        let start = turns.len().saturating_sub(self.config.max_history_turns);
        let mut contents: Vec<Content> = turns[start..]
            .iter()
            .skip_while(|turn| turn.role == ChatRole::Assistant)
            .map(|turn| Content::text(turn.role.upstream_role(), turn.content.as_str()))
            .collect();

        contents.push(Content::text(ChatRole::User.upstream_role(), message));

        GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(self.config.system_instruction())],
            }),
        }
    }

    /// Relay one turn and wait for the whole reply
    pub async fn reply(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let message = self.validate(request)?;
        let upstream = self.build_request(request, &message);
        let start = Instant::now();

        info!(
            model = %self.config.model,
            history = request.history.len(),
            "Relaying chat message"
        );

        let outcome = gemini::generate_content(&self.client, &self.config, &upstream).await;
        metrics::record_chat_duration(&self.config.model, start.elapsed());

        let reply = match outcome {
            Ok(response) => {
                if let Some(usage) = &response.usage_metadata {
                    let model = &self.config.model;
                    metrics::record_chat_tokens(model, "input", usage.prompt_token_count);
                    metrics::record_chat_tokens(model, "output", usage.candidates_token_count);
                }

                let text = response.text();
                if text.trim().is_empty() {
                    warn!("Gemini returned an empty reply, using fallback");
                    fallback_reply()
                } else {
                    ChatReply {
                        reply: text,
                        fallback: false,
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Chat relay failed, using fallback");
                fallback_reply()
            }
        };

        metrics::record_chat(outcome_label(reply.fallback), false);
        Ok(reply)
    }

    /// Relay one turn, streaming the reply as it arrives
    pub async fn reply_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, ChatStreamEvent>, ChatError> {
        let message = self.validate(request)?;
        let upstream = self.build_request(request, &message);

        info!(
            model = %self.config.model,
            history = request.history.len(),
            "Relaying chat message (streaming)"
        );

        match gemini::stream_generate_content(&self.client, &self.config, &upstream).await {
            Ok(response) => {
                let events = response
                    .bytes_stream()
                    .eventsource()
                    .map(|event| event.map(|event| event.data))
                    .boxed();
                Ok(relay_events(events).boxed())
            }
            Err(e) => {
                warn!(error = %e, "Chat stream could not start, using fallback");
                metrics::record_chat(outcome_label(true), true);
                Ok(stream::once(async { fallback_event() }).boxed())
            }
        }
    }
}

fn fallback_reply() -> ChatReply {
    ChatReply {
        reply: FALLBACK_MESSAGE.to_string(),
        fallback: true,
    }
}

fn fallback_event() -> ChatStreamEvent {
    ChatStreamEvent::Fallback(FALLBACK_MESSAGE.to_string())
}

fn outcome_label(fallback: bool) -> &'static str {
    if fallback {
        "fallback"
    } else {
        "success"
    }
}

struct RelayState<S> {
    events: S,
    received_text: bool,
    finished: bool,
}

/// Turn upstream SSE event payloads into reply events
///
/// Ends with `Done` after at least one text fragment, or with `Fallback`
/// when the stream breaks, a chunk cannot be decoded, or no text arrived.
fn relay_events<S, E>(events: S) -> impl Stream<Item = ChatStreamEvent> + Send + 'static
where
    S: Stream<Item = Result<String, E>> + Unpin + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = RelayState {
        events,
        received_text: false,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            match state.events.next().await {
                Some(Ok(data)) => {
                    match serde_json::from_str::<GenerateContentResponse>(&data) {
                        Ok(chunk) => {
                            let text = chunk.text();
                            if text.is_empty() {
                                continue;
                            }
                            state.received_text = true;
                            return Some((ChatStreamEvent::Delta(text), state));
                        }
                        Err(e) => {
                            warn!(error = %e, "Undecodable chat stream chunk, using fallback");
                            state.finished = true;
                            metrics::record_chat(outcome_label(true), true);
                            return Some((fallback_event(), state));
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Chat stream broke, using fallback");
                    state.finished = true;
                    metrics::record_chat(outcome_label(true), true);
                    return Some((fallback_event(), state));
                }
                None => {
                    state.finished = true;
                    if state.received_text {
                        debug!("Chat stream completed");
                        metrics::record_chat(outcome_label(false), true);
                        return Some((ChatStreamEvent::Done, state));
                    }
                    warn!("Chat stream ended without text, using fallback");
                    metrics::record_chat(outcome_label(true), true);
                    return Some((fallback_event(), state));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{prompt::SYSTEM_INSTRUCTION, ChatMessage};

    fn relay() -> ChatRelay {
        ChatRelay::new(
            Client::new(),
            ChatConfig {
                enabled: true,
                api_key: "test-key".to_string(),
                max_history_turns: 3,
                ..ChatConfig::default()
            },
        )
    }

    fn request(message: &str, history: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            history,
        }
    }

    #[test]
    fn test_validate_trims_message() {
        let message = relay()
            .validate(&request("  How do I back up my laptop?  ", vec![]))
            .unwrap();
        assert_eq!(message, "How do I back up my laptop?");
    }

    #[test]
    fn test_validate_rejects_empty_and_long_messages() {
        let relay = relay();
        assert_eq!(relay.validate(&request("   ", vec![])), Err(ChatError::EmptyMessage));

        let long = "a".repeat(501);
        assert_eq!(
            relay.validate(&request(&long, vec![])),
            Err(ChatError::MessageTooLong { length: 501, max: 500 })
        );

        let limit = "a".repeat(500);
        assert!(relay.validate(&request(&limit, vec![])).is_ok());
    }

    #[test]
    fn test_validate_rejects_when_disabled() {
        let relay = ChatRelay::new(Client::new(), ChatConfig::default());
        assert_eq!(relay.validate(&request("hello", vec![])), Err(ChatError::Disabled));
    }

    #[test]
    fn test_build_request_drops_greeting_and_maps_roles() {
        let history = vec![
            ChatMessage::assistant(crate::chat::prompt::GREETING),
            ChatMessage::user("My printer is offline"),
            ChatMessage::assistant("Let's check the cable first."),
        ];
        let upstream = relay().build_request(&request("", history), "Still offline");

        let roles: Vec<&str> = upstream.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(upstream.contents[2].parts[0].text.as_deref(), Some("Still offline"));

        let system = upstream.system_instruction.unwrap();
        assert_eq!(system.parts[0].text.as_deref(), Some(SYSTEM_INSTRUCTION));
    }

    #[test]
    fn test_build_request_caps_history() {
        let history = vec![
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::user("three"),
            ChatMessage::assistant("four"),
            ChatMessage::user("five"),
            ChatMessage::assistant("six"),
        ];
        let upstream = relay().build_request(&request("", history), "seven");

        // The last three turns open with an assistant turn, which is dropped
        let texts: Vec<&str> = upstream
            .contents
            .iter()
            .filter_map(|c| c.parts[0].text.as_deref())
            .collect();
        assert_eq!(texts, vec!["five", "six", "seven"]);
    }

    #[test]
    fn test_build_request_drops_unanswered_user_turn() {
        let history = vec![
            ChatMessage::user("My mouse is laggy"),
            ChatMessage::assistant("Is it wireless?"),
            ChatMessage::user("Yes"),
        ];
        let upstream = relay().build_request(&request("Hello?", history), "Hello?");

        let roles: Vec<&str> = upstream.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(upstream.contents[2].parts[0].text.as_deref(), Some("Hello?"));
    }

    #[test]
    fn test_build_request_with_only_user_history() {
        let history = vec![ChatMessage::user("first try"), ChatMessage::user("second try")];
        let upstream = relay().build_request(&request("third try", history), "third try");

        assert_eq!(upstream.contents.len(), 1);
        assert_eq!(upstream.contents[0].parts[0].text.as_deref(), Some("third try"));
    }

    #[tokio::test]
    async fn test_relay_events_ends_with_done() {
        let chunk = |text: &str| {
            Ok::<_, String>(
                serde_json::json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
                })
                .to_string(),
            )
        };
        let events = stream::iter(vec![chunk("Hello"), chunk(" there")]);

        let collected: Vec<ChatStreamEvent> = relay_events(events).collect().await;
        assert_eq!(
            collected,
            vec![
                ChatStreamEvent::Delta("Hello".to_string()),
                ChatStreamEvent::Delta(" there".to_string()),
                ChatStreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_relay_events_falls_back_on_error() {
        let events = stream::iter(vec![
            Ok(r#"{"candidates":[{"content":{"parts":[{"text":"Partial"}]}}]}"#.to_string()),
            Err("connection reset".to_string()),
        ]);

        let collected: Vec<ChatStreamEvent> = relay_events(events).collect().await;
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[1], ChatStreamEvent::Fallback(FALLBACK_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_relay_events_without_text_falls_back() {
        let events = stream::iter(Vec::<Result<String, String>>::new());
        let collected: Vec<ChatStreamEvent> = relay_events(events).collect().await;
        assert_eq!(collected, vec![ChatStreamEvent::Fallback(FALLBACK_MESSAGE.to_string())]);
    }
}
