//! Address book domain
//!
//! Contacts keyed by name, each holding any number of phones and an
//! optional birthday. Records keep insertion order so listings match the
//! order contacts were added.

mod birthdays;
mod fields;

pub use birthdays::{DEFAULT_UPCOMING_DAYS, UpcomingBirthday};
pub use fields::{BIRTHDAY_FORMAT, Birthday, Name, PHONE_DIGITS, Phone};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by address book operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Phone must contain exactly 10 digits")]
    InvalidPhone,

    #[error("Invalid date format. Use DD.MM.YYYY")]
    InvalidBirthday,

    #[error("Phone not found")]
    PhoneNotFound,

    #[error("Contact not found")]
    ContactNotFound,
}

/// A single contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: Name,
    #[serde(default)]
    pub phones: Vec<Phone>,
    #[serde(default)]
    pub birthday: Option<Birthday>,
}

impl Record {
    pub fn new(name: &str) -> Result<Self, BookError> {
        Ok(Self {
            name: Name::new(name)?,
            phones: Vec::new(),
            birthday: None,
        })
    }

    pub fn add_phone(&mut self, phone: &str) -> Result<(), BookError> {
        self.phones.push(Phone::new(phone)?);
        Ok(())
    }

    /// Replace the first phone equal to `old_phone`
    pub fn edit_phone(&mut self, old_phone: &str, new_phone: &str) -> Result<(), BookError> {
        let slot = self
            .phones
            .iter_mut()
            .find(|phone| phone.as_str() == old_phone)
            .ok_or(BookError::PhoneNotFound)?;
        *slot = Phone::new(new_phone)?;
        Ok(())
    }

    pub fn add_birthday(&mut self, birthday: &str) -> Result<(), BookError> {
        self.birthday = Some(Birthday::parse(birthday)?);
        Ok(())
    }

    /// Phones joined with `"; "`
    pub fn phones_display(&self) -> String {
        self.phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contact name: {}, phones: {}",
            self.name,
            self.phones_display()
        )?;
        if let Some(birthday) = &self.birthday {
            write!(f, ", birthday: {birthday}")?;
        }
        Ok(())
    }
}

/// Contacts keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct AddressBook {
    records: IndexMap<String, Record>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same name
    pub fn add_record(&mut self, record: Record) {
        self.records
            .insert(record.name.as_str().to_string(), record);
    }

    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.get_mut(name)
    }

    /// Like `find_mut`, but a missing contact is an error
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Record, BookError> {
        self.find_mut(name).ok_or(BookError::ContactNotFound)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for AddressBook {
    fn from(records: Vec<Record>) -> Self {
        let mut book = Self::new();
        for record in records {
            book.add_record(record);
        }
        book
    }
}

impl From<AddressBook> for Vec<Record> {
    fn from(book: AddressBook) -> Self {
        book.records.into_values().collect()
    }
}

impl fmt::Display for AddressBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            return f.write_str("Address book is empty");
        }
        let lines: Vec<String> = self.records().map(Record::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}
