mod content;
mod generation_config;
mod model;
mod transcript;
mod turn;

pub use content::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, PromptFeedback,
    UsageMetadata, WireGenerationConfig,
};
pub use generation_config::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationConfig,
    MAX_OUTPUT_TOKENS_RANGE, TEMPERATURE_RANGE, TOP_P_RANGE, parse_max_output_tokens,
    parse_temperature, parse_top_p,
};
pub use model::{KnownModel, Model};
pub use transcript::{Transcript, TranscriptState};
pub use turn::{Role, Turn};
