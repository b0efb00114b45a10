//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript of
//! one conversation and forwards it, whole, to a generation backend on every
//! turn.

use std::time::Instant;

use crate::backend::GenerationBackend;
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_EXCHANGES, SESSION_FAILURES, SESSION_RETRIES, SESSION_TURN_DURATION,
};
use crate::types::{GenerationConfig, Transcript, TranscriptState, Turn};

/// A chat session that manages conversation state and backend calls.
///
/// Each successful [`send`](Self::send) records exactly two turns, the user's
/// message and the model's reply.  A failed call leaves the user's message in
/// place as a pending turn, which can be re-sent with [`retry`](Self::retry)
/// or dropped with [`discard_pending`](Self::discard_pending).
///
/// Calls take `&mut self`, so a session never has two requests in flight.
pub struct ChatSession<B: GenerationBackend> {
    backend: B,
    config: GenerationConfig,
    transcript: Transcript,
    exchanges: u64,
    failed_attempts: u64,
    retries: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The number of turns in the transcript.
    pub turn_count: usize,
    /// Completed user/model exchanges.
    pub exchanges: u64,
    /// Backend calls that failed.
    pub failed_attempts: u64,
    /// Calls made through `retry`.
    pub retries: u64,
    /// Whether a user turn is waiting on a reply.
    pub pending: bool,
    /// The sampling temperature.
    pub temperature: f32,
    /// The top-p value.
    pub top_p: f32,
    /// The maximum output tokens per reply.
    pub max_output_tokens: u32,
}

impl<B: GenerationBackend> ChatSession<B> {
    /// Creates a new chat session with an empty transcript.
    pub fn new(backend: B, config: GenerationConfig) -> Self {
        Self {
            backend,
            config,
            transcript: Transcript::new(),
            exchanges: 0,
            failed_attempts: 0,
            retries: 0,
        }
    }

    /// Sends a user message along with the whole conversation so far.
    ///
    /// Returns the model's reply, which is also appended to the transcript.
    ///
    /// # Errors
    ///
    /// Returns an input error, without touching the transcript, if `message`
    /// is blank or a previous message is still pending.  Returns a generation
    /// error if the backend call fails; the message then stays pending.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(Error::input("message must not be empty"));
        }
        if self.transcript.state() == TranscriptState::ExpectingModelTurn {
            return Err(Error::input(
                "the previous message is still awaiting a reply; retry or discard it first",
            ));
        }
        self.transcript.push(Turn::user(message))?;
        self.complete_pending().await
    }

    /// Re-sends the pending user message after a failed call.
    ///
    /// # Errors
    ///
    /// Returns an input error if nothing is pending, otherwise the same
    /// errors as [`send`](Self::send).
    pub async fn retry(&mut self) -> Result<String> {
        if self.transcript.pending().is_none() {
            return Err(Error::input("there is no pending message to retry"));
        }
        self.retries += 1;
        SESSION_RETRIES.click();
        self.complete_pending().await
    }

    /// Drops the pending user message, if any, and returns it.
    pub fn discard_pending(&mut self) -> Option<Turn> {
        self.transcript.pop_pending()
    }

    async fn complete_pending(&mut self) -> Result<String> {
        let start = Instant::now();
        let outcome = self
            .backend
            .generate(self.transcript.turns(), &self.config)
            .await;
        SESSION_TURN_DURATION.add(start.elapsed().as_secs_f64());

        match outcome {
            Ok(reply) => {
                self.transcript.push(Turn::model(reply.clone()))?;
                self.exchanges += 1;
                SESSION_EXCHANGES.click();
                Ok(reply)
            }
            Err(err) => {
                self.failed_attempts += 1;
                SESSION_FAILURES.click();
                if err.is_generation() {
                    Err(err)
                } else {
                    Err(Error::generation(err.to_string()))
                }
            }
        }
    }

    /// Returns the conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the sampling parameters used for every request.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Returns the backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns which author the transcript expects next.
    pub fn state(&self) -> TranscriptState {
        self.transcript.state()
    }

    /// Returns the number of turns in the conversation.
    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    /// Returns the most recent model reply.
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript.last_reply()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            turn_count: self.turn_count(),
            exchanges: self.exchanges,
            failed_attempts: self.failed_attempts,
            retries: self.retries,
            pending: self.transcript.pending().is_some(),
            temperature: self.config.temperature(),
            top_p: self.config.top_p(),
            max_output_tokens: self.config.max_output_tokens(),
        }
    }
}
