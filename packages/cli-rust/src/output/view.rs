//! Console rendering for the interactive assistant

use assistant_bot_core::View;
use assistant_bot_core::assistant::HELP_TEXT;
use std::io::{self, Stdout, Write};

/// [`View`] that writes replies to a terminal or pipe
///
/// Every write is flushed so replies show up immediately when stdout is
/// not a TTY (e.g. inside a container).
pub struct ConsoleView<W: Write = Stdout> {
    out: W,
}

impl ConsoleView<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, text: &str) {
        // A closed stdout ends the session through EOF on stdin
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> View for ConsoleView<W> {
    fn show_message(&mut self, message: &str) {
        self.write_text(&format!("{message}\n"));
    }

    fn show_contacts(&mut self, contacts: &str) {
        self.write_text(&format!("{contacts}\n"));
    }

    fn show_help(&mut self) {
        self.write_text(HELP_TEXT);
    }

    fn prompt(&mut self, prompt: &str) {
        self.write_text(prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(view: ConsoleView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn messages_end_with_newline() {
        let mut view = ConsoleView::new(Vec::new());
        view.show_message("Contact added.");
        view.show_contacts("Contact name: John, phones: 1234567890");
        assert_eq!(
            rendered(view),
            "Contact added.\nContact name: John, phones: 1234567890\n"
        );
    }

    #[test]
    fn prompt_has_no_newline() {
        let mut view = ConsoleView::new(Vec::new());
        view.prompt(">>> ");
        assert_eq!(rendered(view), ">>> ");
    }

    #[test]
    fn help_lists_commands() {
        let mut view = ConsoleView::new(Vec::new());
        view.show_help();
        let text = rendered(view);
        assert!(text.contains("add-birthday"));
        assert!(text.contains("close / exit"));
    }
}
