use std::future::ready;

use relaybot_test_model::{PresetCompletion, TestModelProvider};
use relaybot_model::ToolCallRequest;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AgentBuilder;
use crate::tool::{Tool, ToolResult};

#[derive(Deserialize, JsonSchema)]
struct UppercaseToolParameters {
    text: String,
}

struct UppercaseTool {
    parameter_schema: Value,
}

impl UppercaseTool {
    fn new() -> Self {
        UppercaseTool {
            parameter_schema: schemars::schema_for!(UppercaseToolParameters)
                .to_value(),
        }
    }
}

impl Tool for UppercaseTool {
    type Input = UppercaseToolParameters;

    fn name(&self) -> &str {
        "uppercase"
    }

    fn description(&self) -> &str {
        "Uppercases the given text."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        ready(Ok(input.text.to_uppercase()))
    }
}

#[tokio::test]
async fn test_simple_message() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_user_input_step();
    model_provider.add_assistant_response_step(PresetCompletion::with_text(
        "Hi, what can I do for you?",
    ));

    let agent = AgentBuilder::with_model_provider(model_provider).build();
    let response = agent.prompt("Hello").await.unwrap();
    assert_eq!(response, "Hi, what can I do for you?");
}

#[tokio::test]
async fn test_preamble_is_sent() {
    // The fake provider skips system messages when it picks a script
    // step, so a script that fits proves the preamble was not counted
    // as a turn.
    let mut model_provider = TestModelProvider::default();
    model_provider.add_user_input_step();
    model_provider
        .add_assistant_response_step(PresetCompletion::with_text("Sure."));

    let agent = AgentBuilder::with_model_provider(model_provider)
        .with_preamble("You are a terse assistant.")
        .build();
    let response = agent.prompt("Hello").await.unwrap();
    assert_eq!(response, "Sure.");
}

#[tokio::test]
async fn test_tool_call_round_trip() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_user_input_step();
    model_provider.add_assistant_response_step(
        PresetCompletion::default().with_tool_call(ToolCallRequest {
            id: "tool:1".to_owned(),
            name: "uppercase".to_owned(),
            arguments: json!({ "text": "hello" }),
        }),
    );
    // The assistant turn and the tool result both enter the history.
    model_provider.add_user_input_step();
    model_provider.add_assistant_response_step(PresetCompletion::with_text(
        "The answer is HELLO.",
    ));

    let agent = AgentBuilder::with_model_provider(model_provider)
        .with_tool(UppercaseTool::new())
        .build();
    let response = agent.prompt("Shout hello for me").await.unwrap();
    assert_eq!(response, "The answer is HELLO.");
}

#[tokio::test]
async fn test_tool_failure_does_not_fail_the_turn() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_user_input_step();
    model_provider.add_assistant_response_step(
        PresetCompletion::default().with_tool_call(ToolCallRequest {
            id: "tool:1".to_owned(),
            name: "missing_tool".to_owned(),
            arguments: json!({}),
        }),
    );
    model_provider.add_user_input_step();
    model_provider.add_assistant_response_step(PresetCompletion::with_text(
        "I couldn't use that tool, sorry.",
    ));

    let agent = AgentBuilder::with_model_provider(model_provider).build();
    let response = agent.prompt("Do the thing").await.unwrap();
    assert_eq!(response, "I couldn't use that tool, sorry.");
}

#[tokio::test]
async fn test_model_error_propagates() {
    // An empty script fails every request.
    let model_provider = TestModelProvider::default();

    let agent = AgentBuilder::with_model_provider(model_provider).build();
    let err = agent.prompt("Hello").await.unwrap_err();
    assert!(matches!(err, crate::PromptError::Model(_)));
}
