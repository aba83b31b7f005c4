//! An abstraction layer for different LLMs.
//!
//! This crate establishes an unified protocol for the agent to interact
//! with various supported LLMs, so that the agent can seamlessly switch
//! between them without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.
//!
//! Providers here are non-streaming: one request yields one complete
//! [`ModelCompletion`]. A chat relay always delivers whole replies, so
//! there is nothing to gain from exposing partial events to the callers.

#![deny(missing_docs)]

mod completion;
mod error;
mod provider;
mod request;

pub use completion::*;
pub use error::*;
pub use provider::*;
pub use request::*;
