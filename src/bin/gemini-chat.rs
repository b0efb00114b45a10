//! Interactive, context-preserving chat with Gemini.
//!
//! # Usage
//!
//! ```bash
//! # Fully interactive: prompts for the key (if unset) and sampling values
//! gemini-chat
//!
//! # Preset sampling values and skip those prompts
//! gemini-chat --temperature 0.2 --top-p 0.9 --max-output-tokens 2048
//!
//! # Another model, no colors, log API traffic to stderr
//! gemini-chat --model gemini-2.0-flash --no-color --verbose
//! ```
//!
//! The API key is read from `GEMINI_API_KEY` or a `.env` file in the current
//! directory.  The process exits with status 1 when no key is available or a
//! generation failure is not retried.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;

use gemini_chat::chat::{
    ChatArgs, ChatConfig, ChatSession, ConversationOutcome, PlainTextRenderer, Renderer,
    prompt_api_key, prompt_generation_config, run_conversation,
};
use gemini_chat::credential::resolve_api_key;
use gemini_chat::{Error, Gemini, Result, StderrLogger};

#[tokio::main]
async fn main() -> ExitCode {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemini-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    match run(config, &mut renderer).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            // The conversation loop has already reported generation failures.
            if !err.is_generation() {
                renderer.print_error(&err.to_string());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ChatConfig, renderer: &mut dyn Renderer) -> Result<ConversationOutcome> {
    renderer.print_heading("=== Context-Aware Gemini Chatbot ===");
    renderer.print_info("This chatbot maintains conversation context across multiple turns.");

    let mut rl = DefaultEditor::new()
        .map_err(|err| Error::io("failed to open terminal", io::Error::other(err.to_string())))?;

    let api_key = match resolve_api_key() {
        Some(key) => key,
        None => {
            renderer.print_info("Gemini API key not found in the environment or .env file.");
            renderer.print_info("Please enter your Gemini API key:");
            prompt_api_key(&mut rl)?
        }
    };

    let mut client = Gemini::with_options(
        Some(api_key),
        config.base_url.clone(),
        Some(config.timeout),
        Some(config.model.clone()),
    )?;
    if config.verbose {
        client = client.with_logger(Arc::new(StderrLogger));
    }

    if config.generation_preset().is_none() {
        renderer.print_heading("--- Model Configuration (Optional) ---");
        renderer.print_info("Press Enter to use defaults, or specify custom values:");
    }
    let generation = prompt_generation_config(&mut rl, &config)?;
    renderer.print_info(&format!(
        "Using configuration: model={}, temperature={}, top_p={}, max_output_tokens={}",
        client.model(),
        generation.temperature(),
        generation.top_p(),
        generation.max_output_tokens(),
    ));

    let mut session = ChatSession::new(client, generation);
    run_conversation(&mut session, &mut rl, renderer).await
}
