//! Interactive prompting.
//!
//! Everything the chat loop asks the operator goes through a [`LineSource`],
//! so the loop can be driven by rustyline in the binary and by scripted
//! input in tests.

use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::config::ChatConfig;
use crate::error::{Error, Result};
use crate::types::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationConfig,
    MAX_OUTPUT_TOKENS_RANGE, TEMPERATURE_RANGE, TOP_P_RANGE, parse_max_output_tokens,
    parse_temperature, parse_top_p,
};

/// A source of operator input lines.
pub trait LineSource {
    /// Shows `prompt` and reads one line without its trailing newline.
    ///
    /// Returns `Ok(None)` at end of input or when the operator interrupts.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(Error::io("failed to read input", err)),
            Err(err) => Err(Error::io(
                "failed to read input",
                io::Error::other(err.to_string()),
            )),
        }
    }
}

/// Reads a line and trims it; end of input reads as the empty string.
pub fn read_trimmed(source: &mut dyn LineSource, prompt: &str) -> Result<String> {
    Ok(source
        .read_line(prompt)?
        .map(|line| line.trim().to_string())
        .unwrap_or_default())
}

/// Interprets a yes/no answer.  Only `y` and `yes` count as yes.
pub fn parse_yes(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Asks a yes/no question that defaults to no.
pub fn ask_yes_no(source: &mut dyn LineSource, question: &str) -> Result<bool> {
    Ok(parse_yes(&read_trimmed(source, question)?))
}

/// Asks the operator for an API key.
///
/// # Errors
///
/// Returns a configuration error when the answer is empty.
pub fn prompt_api_key(source: &mut dyn LineSource) -> Result<String> {
    let key = read_trimmed(source, "API key: ")?;
    if key.is_empty() {
        return Err(Error::configuration("API key is required to continue"));
    }
    Ok(key)
}

/// Builds the session's sampling config, prompting for values not preset.
///
/// Empty or non-numeric answers select the default; numeric answers are
/// clamped into range.
pub fn prompt_generation_config(
    source: &mut dyn LineSource,
    preset: &ChatConfig,
) -> Result<GenerationConfig> {
    let temperature = match preset.temperature {
        Some(value) => value,
        None => {
            let prompt = format!(
                "Temperature ({:.1}-{:.1}, default {DEFAULT_TEMPERATURE}): ",
                TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1
            );
            parse_temperature(&read_trimmed(source, &prompt)?)
        }
    };
    let top_p = match preset.top_p {
        Some(value) => value,
        None => {
            let prompt = format!(
                "Top-p ({:.1}-{:.1}, default {DEFAULT_TOP_P}): ",
                TOP_P_RANGE.0, TOP_P_RANGE.1
            );
            parse_top_p(&read_trimmed(source, &prompt)?)
        }
    };
    let max_output_tokens = match preset.max_output_tokens {
        Some(value) => value,
        None => {
            let prompt = format!(
                "Max output tokens ({}-{}, default {DEFAULT_MAX_OUTPUT_TOKENS}): ",
                MAX_OUTPUT_TOKENS_RANGE.0, MAX_OUTPUT_TOKENS_RANGE.1
            );
            parse_max_output_tokens(&read_trimmed(source, &prompt)?)
        }
    };
    Ok(GenerationConfig::new(temperature, top_p, max_output_tokens))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Script {
        lines: VecDeque<String>,
        prompts: Vec<String>,
    }

    impl Script {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl LineSource for Script {
        fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            Ok(self.lines.pop_front())
        }
    }

    #[test]
    fn yes_answers() {
        assert!(parse_yes("y"));
        assert!(parse_yes("YES"));
        assert!(parse_yes("  Yes "));
        assert!(!parse_yes(""));
        assert!(!parse_yes("n"));
        assert!(!parse_yes("yeah"));
    }

    #[test]
    fn ask_yes_no_defaults_to_no_at_eof() {
        let mut script = Script::new(&[]);
        assert!(!ask_yes_no(&mut script, "Continue? ").unwrap());
        assert_eq!(script.prompts, vec!["Continue? ".to_string()]);
    }

    #[test]
    fn api_key_prompt() {
        let mut script = Script::new(&["  abc  "]);
        assert_eq!(prompt_api_key(&mut script).unwrap(), "abc");

        let mut script = Script::new(&[""]);
        assert!(prompt_api_key(&mut script).unwrap_err().is_configuration());

        let mut script = Script::new(&[]);
        assert!(prompt_api_key(&mut script).unwrap_err().is_configuration());
    }

    #[test]
    fn generation_config_prompts_clamp() {
        let mut script = Script::new(&["3.5", "-0.2", "999999"]);
        let config = prompt_generation_config(&mut script, &ChatConfig::new()).unwrap();
        assert_eq!(config, GenerationConfig::new(2.0, 0.0, 8192));
        assert_eq!(
            script.prompts,
            vec![
                "Temperature (0.0-2.0, default 0.7): ".to_string(),
                "Top-p (0.0-1.0, default 0.95): ".to_string(),
                "Max output tokens (1-8192, default 1024): ".to_string(),
            ]
        );
    }

    #[test]
    fn generation_config_prompts_default_on_garbage() {
        let mut script = Script::new(&["abc", "", "lots"]);
        let config = prompt_generation_config(&mut script, &ChatConfig::new()).unwrap();
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn preset_values_skip_prompts() {
        let preset = ChatConfig::new()
            .with_temperature(Some(1.0))
            .with_max_output_tokens(Some(100));
        let mut script = Script::new(&["0.5"]);
        let config = prompt_generation_config(&mut script, &preset).unwrap();
        assert_eq!(config, GenerationConfig::new(1.0, 0.5, 100));
        assert_eq!(script.prompts.len(), 1);
        assert!(script.prompts[0].starts_with("Top-p"));
    }
}
