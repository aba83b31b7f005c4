//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use relaybot_model::{
    ErrorKind, ModelCompletion, ModelFinishReason, ModelProvider,
    ModelProviderError, ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Clone)]
enum ConversationStep {
    UserInput,
    AssistantResponse(PresetCompletion),
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The added steps will be
/// selected according to the history messages in your request. If there are no
/// enough steps in the script, an error will be returned.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    conversation_script: Vec<ConversationStep>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_assistant_response_step(&mut self, preset: PresetCompletion) {
        self.conversation_script
            .push(ConversationStep::AssistantResponse(preset));
    }

    #[inline]
    pub fn add_user_input_step(&mut self) {
        self.conversation_script.push(ConversationStep::UserInput);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn complete(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelCompletion, Self::Error>> + Send + 'static
    {
        // System instructions don't advance the script, only the turns do.
        let step_idx = req
            .messages
            .iter()
            .filter(|m| !matches!(m, relaybot_model::ModelMessage::System(_)))
            .count();
        let step = self.conversation_script.get(step_idx).cloned();
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;

            let preset = match step {
                Some(ConversationStep::AssistantResponse(preset)) => preset,
                Some(ConversationStep::UserInput) => {
                    return Err(Error {
                        message: "not an assistant response step",
                        kind: ErrorKind::Other,
                    });
                }
                None => {
                    return Err(Error {
                        message: "no enough steps",
                        kind: ErrorKind::RateLimitExceeded,
                    });
                }
            };

            let finish_reason = if preset.tool_calls.is_empty() {
                ModelFinishReason::Stop
            } else {
                ModelFinishReason::ToolCalls
            };
            Ok(ModelCompletion {
                text: preset.text,
                tool_calls: preset.tool_calls,
                finish_reason,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use relaybot_model::{ModelMessage, ToolCallRequest, ToolCallResult};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_complete() {
        let mut provider = TestModelProvider::default();
        provider.add_user_input_step();
        provider.add_assistant_response_step(PresetCompletion::with_text(
            "Hello, world!",
        ));
        provider.add_user_input_step();
        provider.add_assistant_response_step(
            PresetCompletion::with_text("Sure, let me take a look.")
                .with_tool_call(ToolCallRequest {
                    id: "tool:1".to_owned(),
                    name: "get_weather".to_owned(),
                    arguments: json!({ "location": "Philadelphia" }),
                }),
        );

        let mut req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
            tools: vec![],
        };
        let completion = provider.complete(&req).await.unwrap();
        assert_eq!(completion.text, "Hello, world!");
        assert_eq!(completion.finish_reason, ModelFinishReason::Stop);

        req.messages.push(ModelMessage::assistant_text(completion.text));
        req.messages
            .push(ModelMessage::User("How's the weather?".to_owned()));
        let completion = provider.complete(&req).await.unwrap();
        assert_eq!(completion.text, "Sure, let me take a look.");
        assert_eq!(completion.finish_reason, ModelFinishReason::ToolCalls);
        assert_eq!(completion.tool_calls[0].name, "get_weather");
    }

    #[tokio::test]
    async fn test_script_exhaustion() {
        let mut provider = TestModelProvider::default();
        provider.add_user_input_step();
        provider.add_assistant_response_step(PresetCompletion::with_text("Hi"));

        let req = ModelRequest {
            messages: vec![
                ModelMessage::User("Hi".to_owned()),
                ModelMessage::assistant_text("Hi"),
                ModelMessage::User("Still there?".to_owned()),
            ],
            tools: vec![],
        };
        let err = provider.complete(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }

    #[tokio::test]
    async fn test_step_mismatch() {
        // Landing on a user-input step means the script and the request
        // disagree; that is a plain error, distinct from running out of
        // steps.
        let mut provider = TestModelProvider::default();
        provider.add_user_input_step();
        provider.add_user_input_step();

        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
            tools: vec![],
        };
        let err = provider.complete(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_system_message_ignored() {
        let mut provider = TestModelProvider::default();
        provider.add_user_input_step();
        provider.add_assistant_response_step(PresetCompletion::with_text("Hi"));

        let req = ModelRequest {
            messages: vec![
                ModelMessage::System("Be terse.".to_owned()),
                ModelMessage::User("Hi".to_owned()),
            ],
            tools: vec![],
        };
        let completion = provider.complete(&req).await.unwrap();
        assert_eq!(completion.text, "Hi");
    }

    #[tokio::test]
    async fn test_tool_result_advances_script() {
        let mut provider = TestModelProvider::default();
        provider.add_user_input_step();
        provider.add_assistant_response_step(
            PresetCompletion::default().with_tool_call(ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "calculate".to_owned(),
                arguments: json!({ "expression": "2+2" }),
            }),
        );
        // One step for the assistant turn, one for the tool result.
        provider.add_user_input_step();
        provider
            .add_assistant_response_step(PresetCompletion::with_text("It's 4."));

        let req = ModelRequest {
            messages: vec![
                ModelMessage::User("What is 2+2?".to_owned()),
                ModelMessage::Assistant {
                    content: String::new(),
                    tool_calls: vec![ToolCallRequest {
                        id: "tool:1".to_owned(),
                        name: "calculate".to_owned(),
                        arguments: json!({ "expression": "2+2" }),
                    }],
                },
                ModelMessage::Tool(ToolCallResult {
                    id: "tool:1".to_owned(),
                    content: "4".to_owned(),
                }),
            ],
            tools: vec![],
        };
        let completion = provider.complete(&req).await.unwrap();
        assert_eq!(completion.text, "It's 4.");
    }
}
