//! Output rendering for the chat loop.
//!
//! This module provides the [`Renderer`] trait and a plain-text
//! implementation with optional ANSI styling.

use std::io::{self, Stdout, Write};

/// ANSI escape code for bold text (used for headings).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for informational lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for cyan text (used for the speaker label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording output in tests
pub trait Renderer: Send {
    /// Print a section heading such as `--- Turn 1 ---`.
    fn print_heading(&mut self, heading: &str);

    /// Print a model reply, prefixed with the speaker label.
    fn print_reply(&mut self, speaker: &str, text: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print the reply that ends the conversation.
    fn print_final(&mut self, text: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            out: io::stdout(),
            use_color,
        }
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&mut self, style: &str, text: &str) {
        let _ = if self.use_color {
            writeln!(self.out, "{style}{text}{ANSI_RESET}")
        } else {
            writeln!(self.out, "{text}")
        };
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_heading(&mut self, heading: &str) {
        let _ = writeln!(self.out);
        self.styled(ANSI_BOLD, heading);
    }

    fn print_reply(&mut self, speaker: &str, text: &str) {
        let _ = writeln!(self.out);
        let _ = if self.use_color {
            writeln!(self.out, "{ANSI_CYAN}{speaker}:{ANSI_RESET} {text}")
        } else {
            writeln!(self.out, "{speaker}: {text}")
        };
        let _ = self.out.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.styled(ANSI_DIM, info);
    }

    fn print_error(&mut self, error: &str) {
        self.styled(ANSI_RED, error);
    }

    fn print_final(&mut self, text: &str) {
        self.print_heading("=== Final Response ===");
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(use_color: bool, f: impl FnOnce(&mut PlainTextRenderer<Vec<u8>>)) -> String {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), use_color);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn plain_output_has_no_escapes() {
        let out = render(false, |r| {
            r.print_heading("--- Turn 1 ---");
            r.print_reply("Gemini", "Hello there");
            r.print_info("Sending...");
            r.print_error("Error occurred: boom");
        });
        assert_eq!(
            out,
            "\n--- Turn 1 ---\n\nGemini: Hello there\nSending...\nError occurred: boom\n"
        );
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn colored_output_resets_styles() {
        let out = render(true, |r| r.print_error("bad"));
        assert_eq!(out, format!("{ANSI_RED}bad{ANSI_RESET}\n"));
    }

    #[test]
    fn final_response_block() {
        let out = render(false, |r| r.print_final("R1"));
        assert_eq!(out, "\n=== Final Response ===\nR1\n");
    }
}
