use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemini_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("gemini_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemini_chat.client.request_duration_seconds");
pub(crate) static CLIENT_PROMPT_TOKENS: Counter = Counter::new("gemini_chat.client.prompt_tokens");
pub(crate) static CLIENT_CANDIDATE_TOKENS: Counter =
    Counter::new("gemini_chat.client.candidate_tokens");

pub(crate) static SESSION_EXCHANGES: Counter = Counter::new("gemini_chat.session.exchanges");
pub(crate) static SESSION_FAILURES: Counter = Counter::new("gemini_chat.session.failures");
pub(crate) static SESSION_RETRIES: Counter = Counter::new("gemini_chat.session.retries");
pub(crate) static SESSION_TURN_DURATION: Moments =
    Moments::new("gemini_chat.session.turn_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_counter(&CLIENT_PROMPT_TOKENS);
    collector.register_counter(&CLIENT_CANDIDATE_TOKENS);

    collector.register_counter(&SESSION_EXCHANGES);
    collector.register_counter(&SESSION_FAILURES);
    collector.register_counter(&SESSION_RETRIES);
    collector.register_moments(&SESSION_TURN_DURATION);
}
