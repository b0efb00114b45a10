//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.  Every flag is optional; values
//! not given on the command line are asked for interactively.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_TIMEOUT;
use crate::types::{
    GenerationConfig, Model, parse_max_output_tokens, parse_temperature, parse_top_p,
};

/// Command-line arguments for the gemini-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-1.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// Alternate API base URL.
    #[arrrg(optional, "API base URL (default: Gemini v1beta)", "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Sampling temperature, skipping the interactive prompt.
    #[arrrg(optional, "Temperature 0.0-2.0 (skips the prompt)", "TEMP")]
    pub temperature: Option<String>,

    /// Top-p, skipping the interactive prompt.
    #[arrrg(optional, "Top-p 0.0-1.0 (skips the prompt)", "TOP_P")]
    pub top_p: Option<String>,

    /// Max output tokens, skipping the interactive prompt.
    #[arrrg(optional, "Max output tokens 1-8192 (skips the prompt)", "TOKENS")]
    pub max_output_tokens: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log every request and response to stderr.
    #[arrrg(flag, "Log API requests and responses to stderr")]
    pub verbose: bool,
}

/// Configuration for a chat run.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.  Sampling values left
/// as `None` are prompted for.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Alternate API base URL, if any.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Preset sampling temperature.
    pub temperature: Option<f32>,

    /// Preset top-p value.
    pub top_p: Option<f32>,

    /// Preset cap on generated tokens.
    pub max_output_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log API traffic to stderr.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-1.5-flash
    /// - Timeout: 30 seconds
    /// - Sampling values: prompted
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            temperature: None,
            top_p: None,
            max_output_tokens: None,
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Presets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Presets the top-p value.
    pub fn with_top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    /// Presets the output token cap.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables request/response logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The sampling config, if every value was preset and nothing needs prompting.
    pub fn generation_preset(&self) -> Option<GenerationConfig> {
        Some(GenerationConfig::new(
            self.temperature?,
            self.top_p?,
            self.max_output_tokens?,
        ))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or_default();

        ChatConfig {
            model,
            base_url: args.base_url,
            timeout: args
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            temperature: args.temperature.as_deref().map(parse_temperature),
            top_p: args.top_p.as_deref().map(parse_top_p),
            max_output_tokens: args.max_output_tokens.as_deref().map(parse_max_output_tokens),
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini15Flash));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.base_url.is_none());
        assert!(config.temperature.is_none());
        assert!(config.top_p.is_none());
        assert!(config.max_output_tokens.is_none());
        assert!(config.use_color);
        assert!(!config.verbose);
        assert!(config.generation_preset().is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-flash".to_string()),
            base_url: Some("http://localhost:9000/".to_string()),
            timeout_secs: Some(5),
            temperature: Some("3.5".to_string()),
            top_p: Some("-0.2".to_string()),
            max_output_tokens: Some("999999".to_string()),
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.temperature, Some(2.0));
        assert_eq!(config.top_p, Some(0.0));
        assert_eq!(config.max_output_tokens, Some(8192));
        assert!(!config.use_color);
        assert!(config.verbose);
        assert_eq!(
            config.generation_preset(),
            Some(GenerationConfig::new(2.0, 0.0, 8192))
        );
    }

    #[test]
    fn non_numeric_flags_fall_back_to_defaults() {
        let args = ChatArgs {
            temperature: Some("hot".to_string()),
            top_p: Some("".to_string()),
            max_output_tokens: Some("many".to_string()),
            timeout_secs: Some(0),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.generation_preset(), Some(GenerationConfig::default()));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini15Pro))
            .with_base_url(Some("http://example.test/".to_string()))
            .with_timeout(Duration::from_secs(10))
            .with_temperature(Some(0.2))
            .with_top_p(Some(0.8))
            .with_max_output_tokens(Some(64))
            .without_color()
            .with_verbose(true);

        assert_eq!(config.model, Model::Known(KnownModel::Gemini15Pro));
        assert_eq!(config.base_url.as_deref(), Some("http://example.test/"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.top_p, Some(0.8));
        assert_eq!(config.max_output_tokens, Some(64));
        assert!(!config.use_color);
        assert!(config.verbose);
    }
}
