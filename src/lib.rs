//! Story Weaver - collaborative story writing with an LLM
//!
//! A completion proxy that frames every turn with fixed story-writer
//! instructions, and the client-side session state machine that drives it.

pub mod api;
pub mod client;
pub mod llm;
pub mod message;
pub mod session;
pub mod story_prompt;
