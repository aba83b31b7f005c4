//! Core logic including the conversation window, prompt assembly, the
//! agent loop, tool execution, etc.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod model_client;
pub mod prompt;
pub mod tool;

pub use agent::{Agent, AgentBuilder, PromptError};
