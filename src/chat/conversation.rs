//! The turn-by-turn interactive flow.
//!
//! A conversation asks for a first message, then a follow-up, then offers
//! further turns one at a time until the operator declines.  The last reply
//! is reported as the final response.

use crate::backend::GenerationBackend;
use crate::chat::prompt::{LineSource, ask_yes_no, read_trimmed};
use crate::chat::session::ChatSession;
use crate::error::Result;
use crate::render::Renderer;

/// Label printed in front of model replies.
pub const SPEAKER: &str = "Gemini";

/// How a conversation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationOutcome {
    /// The operator gave no first message.
    NoInput,

    /// At least one exchange completed; holds the last reply.
    Finished {
        /// The final model reply.
        final_response: String,
    },
}

/// Runs the interactive flow against `session`.
///
/// # Errors
///
/// A generation failure is reported through `renderer` and the operator is
/// offered a retry.  If they decline, the failure is returned.  Input errors
/// from `input` are returned as-is.
pub async fn run_conversation<B: GenerationBackend>(
    session: &mut ChatSession<B>,
    input: &mut dyn LineSource,
    renderer: &mut dyn Renderer,
) -> Result<ConversationOutcome> {
    renderer.print_heading("=== Starting Conversation ===");

    renderer.print_heading("--- Turn 1 ---");
    let first = read_trimmed(input, "Enter your first message: ")?;
    if first.is_empty() {
        renderer.print_info("No input provided. Exiting.");
        return Ok(ConversationOutcome::NoInput);
    }
    renderer.print_info("Sending to Gemini...");
    let mut last = exchange(session, input, renderer, &first).await?;

    renderer.print_heading("--- Turn 2 ---");
    let follow_up = read_trimmed(input, "Enter your follow-up message: ")?;
    if follow_up.is_empty() {
        renderer.print_info("No input provided. Ending conversation.");
        renderer.print_final(&last);
        return Ok(ConversationOutcome::Finished {
            final_response: last,
        });
    }
    renderer.print_info("Sending to Gemini (with context)...");
    last = exchange(session, input, renderer, &follow_up).await?;

    let mut turn = 3;
    loop {
        renderer.print_heading(&format!("--- Turn {turn} (Optional) ---"));
        if !ask_yes_no(input, "Continue conversation? (y/n, default n): ")? {
            break;
        }
        let message = read_trimmed(input, "Enter your message: ")?;
        if message.is_empty() {
            renderer.print_info("No input provided. Ending conversation.");
            break;
        }
        renderer.print_info("Sending to Gemini (with full context)...");
        last = exchange(session, input, renderer, &message).await?;
        turn += 1;
    }

    renderer.print_final(&last);
    Ok(ConversationOutcome::Finished {
        final_response: last,
    })
}

async fn exchange<B: GenerationBackend>(
    session: &mut ChatSession<B>,
    input: &mut dyn LineSource,
    renderer: &mut dyn Renderer,
    message: &str,
) -> Result<String> {
    let mut outcome = session.send(message).await;
    loop {
        match outcome {
            Ok(reply) => {
                renderer.print_reply(SPEAKER, &reply);
                return Ok(reply);
            }
            Err(err) if err.is_generation() => {
                renderer.print_error(&format!("Error occurred: {err}"));
                if !ask_yes_no(input, "Retry? (y/n, default n): ")? {
                    renderer.print_info("Please check your API key and internet connection.");
                    return Err(err);
                }
                outcome = session.retry().await;
            }
            Err(err) => return Err(err),
        }
    }
}
