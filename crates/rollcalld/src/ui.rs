//! Terminal implementations of the prompt and renderer collaborators.

use rollcall_core::{Frame, Prompter, Region, Renderer};
use std::io::{self, BufRead, Write};

/// Asks for names on standard input. Runs only in the controller context,
/// so blocking on the terminal is fine.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let name = line.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Headless stand-in for an overlay: logs annotations instead of drawing.
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn draw(&mut self, _frame: &Frame, region: &Region, label: Option<&str>) {
        tracing::debug!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            label = label.unwrap_or(""),
            "face"
        );
    }

    fn display(&mut self, _frame: &Frame) {}
}
