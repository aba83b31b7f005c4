mod builder;
#[cfg(test)]
mod tests;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use relaybot_model::{
    ModelMessage, ModelProviderError, ModelRequest, ToolCallResult,
};

use crate::model_client::ModelClient;
use crate::tool::Executor as ToolExecutor;
pub use builder::AgentBuilder;

/// Maximum model round-trips a single prompt may spend on tool calls.
const MAX_TOOL_ROUNDS: usize = 10;

/// A responder backed by a model provider and a set of tools.
///
/// The agent is stateless across calls: every [`Agent::prompt`] call
/// carries its whole context in the prompt text, so one instance can be
/// shared between any number of users.
pub struct Agent {
    model_client: ModelClient,
    tool_executor: ToolExecutor,
    preamble: Option<String>,
}

impl Agent {
    /// Generates a response for the given prompt.
    ///
    /// The model may request tool calls before producing its final text;
    /// those are executed here and their results are fed back until the
    /// model stops, up to [`MAX_TOOL_ROUNDS`] round-trips. A failing tool
    /// is reported to the model as a textual result and never fails the
    /// turn; a failing model request does.
    pub async fn prompt(&self, input: &str) -> Result<String, PromptError> {
        let mut messages = Vec::new();
        if let Some(preamble) = &self.preamble {
            messages.push(ModelMessage::System(preamble.clone()));
        }
        messages.push(ModelMessage::User(input.to_owned()));

        let tools = self.tool_executor.definitions();

        for round in 0..MAX_TOOL_ROUNDS {
            let req = ModelRequest {
                messages: messages.clone(),
                tools: tools.clone(),
            };
            let completion = self
                .model_client
                .complete(req)
                .await
                .map_err(PromptError::Model)?;

            if completion.tool_calls.is_empty() {
                return Ok(completion.text);
            }

            debug!(
                "model requested {} tool call(s) in round {round}",
                completion.tool_calls.len()
            );
            messages.push(ModelMessage::Assistant {
                content: completion.text,
                tool_calls: completion.tool_calls.clone(),
            });
            for call in &completion.tool_calls {
                let content = match self.tool_executor.execute(call).await {
                    Ok(output) => output,
                    Err(err) => {
                        // Recovered locally: the model sees the failure as
                        // text and decides how to go on.
                        warn!("tool `{}` failed: {}", call.name, err.reason());
                        format!("Error: {}", err.reason())
                    }
                };
                messages.push(ModelMessage::Tool(ToolCallResult {
                    id: call.id.clone(),
                    content,
                }));
            }
        }
        Err(PromptError::ToolRoundsExhausted)
    }
}

impl Agent {
    pub(crate) fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            model_client,
            preamble,
            tools,
        } = builder;

        Self {
            model_client,
            tool_executor: ToolExecutor::with_tools(tools),
            preamble,
        }
    }
}

/// The error returned when [`Agent::prompt`] fails.
#[derive(Debug)]
pub enum PromptError {
    /// The model request failed.
    Model(Box<dyn ModelProviderError>),
    /// The model kept requesting tools past the round budget.
    ToolRoundsExhausted,
}

impl Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Model(err) => {
                write!(f, "model request failed: {err}")
            }
            PromptError::ToolRoundsExhausted => {
                write!(f, "tool round budget exhausted")
            }
        }
    }
}

impl StdError for PromptError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PromptError::Model(err) => {
                Some(err.as_ref() as &(dyn StdError + 'static))
            }
            PromptError::ToolRoundsExhausted => None,
        }
    }
}
