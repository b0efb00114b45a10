//! Chat application module for context-preserving conversations with Gemini.
//!
//! This module provides the conversation session and the interactive flow
//! built on top of it:
//!
//! - [`session`]: the transcript-owning session and its `send` operation
//! - [`conversation`]: the turn-by-turn interactive loop
//! - [`config`]: CLI argument parsing and configuration
//! - [`prompt`]: operator input and the values parsed from it

mod config;
mod conversation;
mod prompt;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use config::{ChatArgs, ChatConfig};
pub use conversation::{ConversationOutcome, SPEAKER, run_conversation};
pub use prompt::{
    LineSource, ask_yes_no, parse_yes, prompt_api_key, prompt_generation_config, read_trimmed,
};
pub use session::{ChatSession, SessionStats};
