//! Validated contact fields
//!
//! Each field validates on construction, so a `Record` can never hold a
//! malformed name, phone, or birthday.

use super::BookError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used for both input and display of birthdays
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

/// Number of digits a phone number must have
pub const PHONE_DIGITS: usize = 10;

/// Contact name (non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, BookError> {
        if value.is_empty() {
            return Err(BookError::EmptyName);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Name {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phone number: exactly ten ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn new(value: &str) -> Result<Self, BookError> {
        let valid =
            value.len() == PHONE_DIGITS && value.bytes().all(|byte| byte.is_ascii_digit());
        if !valid {
            return Err(BookError::InvalidPhone);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Birthday parsed from `DD.MM.YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn parse(value: &str) -> Result<Self, BookError> {
        NaiveDate::parse_from_str(value, BIRTHDAY_FORMAT)
            .map(Self)
            .map_err(|_| BookError::InvalidBirthday)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Birthday {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl TryFrom<String> for Birthday {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Birthday> for String {
    fn from(birthday: Birthday) -> Self {
        birthday.to_string()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_empty() {
        assert!(matches!(Name::new(""), Err(BookError::EmptyName)));
        assert_eq!(Name::new("Alice").unwrap().as_str(), "Alice");
    }

    #[test]
    fn phone_requires_ten_digits() {
        assert!(Phone::new("0123456789").is_ok());
        assert!(matches!(Phone::new("123"), Err(BookError::InvalidPhone)));
        assert!(matches!(
            Phone::new("01234567890"),
            Err(BookError::InvalidPhone)
        ));
        assert!(matches!(
            Phone::new("01234abcde"),
            Err(BookError::InvalidPhone)
        ));
        assert!(matches!(
            Phone::new("+123456789"),
            Err(BookError::InvalidPhone)
        ));
    }

    #[test]
    fn phone_error_message() {
        let err = Phone::new("12").unwrap_err();
        assert_eq!(err.to_string(), "Phone must contain exactly 10 digits");
    }

    #[test]
    fn birthday_parses_day_month_year() {
        let birthday = Birthday::parse("05.03.1990").unwrap();
        assert_eq!(
            birthday.date(),
            NaiveDate::from_ymd_opt(1990, 3, 5).unwrap()
        );
        assert_eq!(birthday.to_string(), "05.03.1990");
    }

    #[test]
    fn birthday_rejects_other_formats() {
        for input in ["1990-03-05", "31.02.2001", "05/03/1990", ""] {
            let err = Birthday::parse(input).unwrap_err();
            assert_eq!(err.to_string(), "Invalid date format. Use DD.MM.YYYY");
        }
    }

    #[test]
    fn phone_deserialize_validates() {
        let parsed: Result<Phone, _> = serde_json::from_str("\"12345\"");
        assert!(parsed.is_err());
        let parsed: Phone = serde_json::from_str("\"5550001111\"").unwrap();
        assert_eq!(parsed.as_str(), "5550001111");
    }
}
