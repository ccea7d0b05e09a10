use crate::notifier::interface::{Notice, Notifier};
use std::error::Error;

/// Prints each notice inside a box the width of its message.
pub struct NotifierConsole {
    max_width: usize,
}

impl NotifierConsole {
    pub fn new() -> Self {
        Self { max_width: 48 }
    }

    fn render(&self, notice: &Notice) -> String {
        let text: String = notice.to_string().chars().take(self.max_width).collect();
        let width = text.chars().count();
        format!(
            "┌{}┐\n│{}│\n└{}┘",
            "─".repeat(width),
            text,
            "─".repeat(width)
        )
    }
}

impl Default for NotifierConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierConsole {
    fn notify(&self, notice: &Notice) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("{}", self.render(notice));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_boxes_message() {
        let console = NotifierConsole::new();

        let rendered = console.render(&Notice::info("Saved dog"));

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "│[info] Saved dog│");
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn test_render_truncates_long_messages() {
        let console = NotifierConsole::new();

        let rendered = console.render(&Notice::error("x".repeat(200)));

        assert_eq!(rendered.lines().nth(1).unwrap().chars().count(), 50);
    }
}
