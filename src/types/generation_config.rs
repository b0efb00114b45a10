use serde::Serialize;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default nucleus sampling value.
pub const DEFAULT_TOP_P: f32 = 0.95;
/// Default cap on generated tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Inclusive range accepted for `temperature`.
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);
/// Inclusive range accepted for `top_p`.
pub const TOP_P_RANGE: (f32, f32) = (0.0, 1.0);
/// Inclusive range accepted for `max_output_tokens`.
pub const MAX_OUTPUT_TOKENS_RANGE: (u32, u32) = (1, 8192);

/// Sampling parameters sent with every request of a session.
///
/// Values are clamped into range on construction and cannot change
/// afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

impl GenerationConfig {
    /// Creates a config, clamping each value into its range.
    ///
    /// A NaN float is replaced by that field's default.
    pub fn new(temperature: f32, top_p: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature: clamp_f32(temperature, TEMPERATURE_RANGE, DEFAULT_TEMPERATURE),
            top_p: clamp_f32(top_p, TOP_P_RANGE, DEFAULT_TOP_P),
            max_output_tokens: max_output_tokens
                .clamp(MAX_OUTPUT_TOKENS_RANGE.0, MAX_OUTPUT_TOKENS_RANGE.1),
        }
    }

    /// Builds a config from raw operator input.
    ///
    /// Empty or non-numeric input selects the default; numeric input is
    /// clamped.  `max_output_tokens` must be an integer.
    pub fn from_raw(temperature: &str, top_p: &str, max_output_tokens: &str) -> Self {
        Self {
            temperature: parse_temperature(temperature),
            top_p: parse_top_p(top_p),
            max_output_tokens: parse_max_output_tokens(max_output_tokens),
        }
    }

    /// The sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// The nucleus sampling value.
    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    /// The cap on generated tokens.
    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Parses a raw temperature, falling back to the default.
pub fn parse_temperature(raw: &str) -> f32 {
    parse_f32(raw, TEMPERATURE_RANGE, DEFAULT_TEMPERATURE)
}

/// Parses a raw top-p value, falling back to the default.
pub fn parse_top_p(raw: &str) -> f32 {
    parse_f32(raw, TOP_P_RANGE, DEFAULT_TOP_P)
}

/// Parses a raw token cap, falling back to the default.
pub fn parse_max_output_tokens(raw: &str) -> u32 {
    let (min, max) = MAX_OUTPUT_TOKENS_RANGE;
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_MAX_OUTPUT_TOKENS;
    }
    match raw.parse::<i64>() {
        Ok(value) => value.clamp(min as i64, max as i64) as u32,
        Err(err) => match err.kind() {
            std::num::IntErrorKind::PosOverflow => max,
            std::num::IntErrorKind::NegOverflow => min,
            _ => DEFAULT_MAX_OUTPUT_TOKENS,
        },
    }
}

fn parse_f32(raw: &str, range: (f32, f32), default: f32) -> f32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }
    match raw.parse::<f32>() {
        Ok(value) => clamp_f32(value, range, default),
        Err(_) => default,
    }
}

fn clamp_f32(value: f32, (min, max): (f32, f32), default: f32) -> f32 {
    // NaN takes the default instead of saturating to the upper bound.
    if value.is_nan() {
        default
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature(), 0.7);
        assert_eq!(config.top_p(), 0.95);
        assert_eq!(config.max_output_tokens(), 1024);
        assert_eq!(GenerationConfig::from_raw("", "", ""), config);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = GenerationConfig::from_raw("3.5", "-0.2", "999999");
        assert_eq!(config.temperature(), 2.0);
        assert_eq!(config.top_p(), 0.0);
        assert_eq!(config.max_output_tokens(), 8192);

        let config = GenerationConfig::from_raw("-1", "7", "0");
        assert_eq!(config.temperature(), 0.0);
        assert_eq!(config.top_p(), 1.0);
        assert_eq!(config.max_output_tokens(), 1);
    }

    #[test]
    fn non_numeric_values_use_defaults() {
        let config = GenerationConfig::from_raw("warm", "most", "lots");
        assert_eq!(config, GenerationConfig::default());
        assert_eq!(parse_max_output_tokens("12.5"), DEFAULT_MAX_OUTPUT_TOKENS);
        assert_eq!(parse_temperature("NaN"), DEFAULT_TEMPERATURE);
        assert_eq!(parse_top_p("nan"), DEFAULT_TOP_P);
    }

    #[test]
    fn in_range_values_are_kept() {
        let config = GenerationConfig::from_raw(" 1.25 ", "0.5", " 2048");
        assert_eq!(config.temperature(), 1.25);
        assert_eq!(config.top_p(), 0.5);
        assert_eq!(config.max_output_tokens(), 2048);
    }

    #[test]
    fn huge_integers_clamp_instead_of_defaulting() {
        assert_eq!(parse_max_output_tokens("99999999999999999999999"), 8192);
        assert_eq!(parse_max_output_tokens("-99999999999999999999999"), 1);
        assert_eq!(parse_max_output_tokens("-5"), 1);
    }

    #[test]
    fn new_clamps() {
        let config = GenerationConfig::new(9.0, f32::NAN, 0);
        assert_eq!(config.temperature(), 2.0);
        assert_eq!(config.top_p(), DEFAULT_TOP_P);
        assert_eq!(config.max_output_tokens(), 1);
    }
}
