use relaybot_model::ToolCallRequest;
use serde::{Deserialize, Serialize};

/// The preset completion for an assistant step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCompletion {
    /// The assistant text in this completion.
    pub text: String,
    /// Tool calls requested in this completion.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl PresetCompletion {
    /// Creates a `PresetCompletion` with the specified text.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: vec![],
        }
    }

    /// Adds a tool call to the completion.
    #[inline]
    pub fn with_tool_call(mut self, tool_call: ToolCallRequest) -> Self {
        self.tool_calls.push(tool_call);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let completion = PresetCompletion::with_text("Checking the forecast.")
            .with_tool_call(ToolCallRequest {
                id: "1".to_string(),
                name: "get_weather".to_string(),
                arguments: json!({
                    "location": "New York"
                }),
            });

        let serialized = serde_json::to_string(&completion).unwrap();
        let deserialized: PresetCompletion =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(completion, deserialized);
    }
}
