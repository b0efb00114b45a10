//! API key discovery.
//!
//! The key comes from the process environment first and from a `.env` file
//! in the working directory second.  The environment is never modified.

use std::env;
use std::fs;
use std::path::Path;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Name of the dotenv file consulted when the variable is unset.
pub const DOTENV_FILE: &str = ".env";

/// Looks up the API key in the environment, then in `./.env`.
///
/// Blank values count as absent.
pub fn resolve_api_key() -> Option<String> {
    non_blank(env::var(API_KEY_VAR).ok())
        .or_else(|| dotenv_value(Path::new(DOTENV_FILE), API_KEY_VAR))
}

/// Reads `key` from a dotenv-style file, if the file exists and sets it.
pub fn dotenv_value(path: &Path, key: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    parse_dotenv(&contents, key)
}

/// Finds `key` in dotenv-formatted text.
///
/// Lines are `KEY=VALUE`; blank lines and `#` comments are skipped, an
/// `export ` prefix is tolerated, and a quoted value is taken up to its
/// closing quote.  In an unquoted value, a `#` preceded by whitespace starts
/// a trailing comment.  The last assignment wins.
pub fn parse_dotenv(contents: &str, key: &str) -> Option<String> {
    let mut found = None;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        if name.trim() != key {
            continue;
        }
        found = Some(parse_value(value).to_string());
    }
    non_blank(found)
}

fn parse_value(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            if let Some(end) = rest.find(quote) {
                return &rest[..end];
            }
        }
    }
    strip_inline_comment(value).trim_end()
}

fn strip_inline_comment(value: &str) -> &str {
    let cut = value
        .char_indices()
        .find(|&(i, c)| c == '#' && value[..i].ends_with(char::is_whitespace))
        .map(|(i, _)| i);
    match cut {
        Some(i) => &value[..i],
        None => value,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
