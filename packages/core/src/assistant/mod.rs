//! Interactive assistant
//!
//! Reads commands line by line, applies them to the address book, and
//! renders replies through a [`View`]. The book is saved when the session
//! ends, either through `exit`/`close` or end of input.

mod command;

pub use command::{Command, CommandError, parse_input, split_input};

use crate::book::{AddressBook, BookError, Record};
use crate::store::{StoreError, load_book, save_book};
use chrono::NaiveDate;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Input prompt
pub const PROMPT: &str = ">>> ";

pub const WELCOME_MESSAGE: &str = "Welcome to the assistant bot!";

pub const GOODBYE_MESSAGE: &str = "Good bye!";

/// Command summary shown on start and by `help`
pub const HELP_TEXT: &str = "
Available commands:
hello
add <name> <phone>
change <name> <old_phone> <new_phone>
phone <name>
all
add-birthday <name> <DD.MM.YYYY>
show-birthday <name>
birthdays
help
close / exit
";

/// Output surface for the assistant
pub trait View {
    fn show_message(&mut self, message: &str);

    fn show_contacts(&mut self, contacts: &str);

    fn show_help(&mut self);

    /// Ask for the next line of input
    fn prompt(&mut self, prompt: &str);
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    Contacts(String),
    Help,
    Exit,
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read input: {0}")]
    Input(#[from] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The address book plus where it is persisted
pub struct Assistant {
    book: AddressBook,
    book_path: PathBuf,
    upcoming_days: u32,
}

impl Assistant {
    pub fn new(book: AddressBook, book_path: PathBuf, upcoming_days: u32) -> Self {
        Self {
            book,
            book_path,
            upcoming_days,
        }
    }

    /// Load the book stored at `book_path`
    pub fn open(book_path: &Path, upcoming_days: u32) -> Result<Self, StoreError> {
        let book = load_book(book_path)?;
        Ok(Self::new(book, book_path.to_path_buf(), upcoming_days))
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    pub fn book_path(&self) -> &Path {
        &self.book_path
    }

    pub fn save(&self) -> Result<(), StoreError> {
        save_book(&self.book, &self.book_path)
    }

    /// Apply a command to the book
    pub fn execute(&mut self, command: Command, today: NaiveDate) -> Result<Reply, BookError> {
        let reply = match command {
            Command::Exit => Reply::Exit,
            Command::Hello => Reply::message("How can I help you?"),
            Command::Help => Reply::Help,
            Command::Add { name, phone } => {
                // Validate before touching the book so a bad number
                // never leaves an empty contact behind.
                let mut record = match self.book.find(&name) {
                    Some(existing) => existing.clone(),
                    None => Record::new(&name)?,
                };
                record.add_phone(&phone)?;
                self.book.add_record(record);
                Reply::message("Contact added.")
            }
            Command::Change {
                name,
                old_phone,
                new_phone,
            } => {
                self.book
                    .require_mut(&name)?
                    .edit_phone(&old_phone, &new_phone)?;
                Reply::message("Phone updated.")
            }
            Command::Phone { name } => {
                let record = self.book.find(&name).ok_or(BookError::ContactNotFound)?;
                Reply::Message(record.phones_display())
            }
            Command::All => Reply::Contacts(self.book.to_string()),
            Command::AddBirthday { name, birthday } => {
                self.book.require_mut(&name)?.add_birthday(&birthday)?;
                Reply::message("Birthday added.")
            }
            Command::ShowBirthday { name } => {
                match self.book.find(&name).and_then(|record| record.birthday) {
                    Some(birthday) => Reply::Message(birthday.to_string()),
                    None => Reply::message("No birthday set."),
                }
            }
            Command::Birthdays => {
                let upcoming = self.book.upcoming_birthdays(today, self.upcoming_days);
                if upcoming.is_empty() {
                    Reply::message("No upcoming birthdays.")
                } else {
                    let lines: Vec<String> = upcoming
                        .iter()
                        .map(|entry| {
                            format!("{}: {}", entry.name, entry.congratulation_date_display())
                        })
                        .collect();
                    Reply::Message(lines.join("\n"))
                }
            }
            Command::Unknown(word) => {
                debug!("Unknown command: {}", word);
                Reply::message("Invalid command.")
            }
        };
        Ok(reply)
    }

    /// Parse and execute one line, returning `None` for blank input
    pub fn handle_line(&mut self, line: &str, today: NaiveDate) -> Option<Reply> {
        let command = match parse_input(line) {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => return Some(Reply::Message(format!("Error: {e}"))),
        };
        match self.execute(command, today) {
            Ok(reply) => Some(reply),
            Err(e) => Some(Reply::Message(format!("Error: {e}"))),
        }
    }
}

/// Run the read-eval-print loop until `exit`/`close` or end of input
///
/// `today` is consulted for each command so a long session sees the date
/// change.
pub fn run_session<R, V, F>(
    assistant: &mut Assistant,
    mut input: R,
    view: &mut V,
    mut today: F,
) -> Result<(), SessionError>
where
    R: BufRead,
    V: View,
    F: FnMut() -> NaiveDate,
{
    view.show_message(WELCOME_MESSAGE);
    view.show_help();

    let mut line = String::new();
    loop {
        view.prompt(PROMPT);
        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input, closing session");
            break;
        }

        match assistant.handle_line(&line, today()) {
            None => {}
            Some(Reply::Exit) => break,
            Some(Reply::Message(text)) => view.show_message(&text),
            Some(Reply::Contacts(text)) => view.show_contacts(&text),
            Some(Reply::Help) => view.show_help(),
        }
    }

    assistant.save()?;
    view.show_message(GOODBYE_MESSAGE);
    Ok(())
}
