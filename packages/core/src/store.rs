//! Address book persistence
//!
//! The book is stored as a versioned JSON document. A missing file loads as
//! an empty book; a file that fails to parse is an error so it is never
//! overwritten by an empty book on the next save.

use crate::book::{AddressBook, Record};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Current on-disk format version
pub const BOOK_FORMAT_VERSION: u32 = 1;

/// Default file name for the address book
pub const BOOK_FILE_NAME: &str = "addressbook.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read address book {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write address book {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Address book {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Address book {path} has unsupported version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("Failed to encode address book: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct BookDocument {
    version: u32,
    #[serde(default)]
    contacts: Vec<Record>,
}

/// Load the address book at `path`, returning an empty book if the file
/// does not exist
pub fn load_book(path: &Path) -> Result<AddressBook, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No address book at {}, starting empty", path.display());
            return Ok(AddressBook::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let document: BookDocument =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if document.version != BOOK_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: document.version,
        });
    }

    debug!(
        "Loaded {} contacts from {}",
        document.contacts.len(),
        path.display()
    );
    Ok(AddressBook::from(document.contacts))
}

/// Save the address book to `path`
///
/// Writes a sibling temp file and renames it over the target, creating
/// parent directories as needed.
pub fn save_book(book: &AddressBook, path: &Path) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let document = BookDocument {
        version: BOOK_FORMAT_VERSION,
        contacts: book.clone().into(),
    };
    let json = serde_json::to_string_pretty(&document)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, json).map_err(write_err)?;
    fs::rename(&tmp_path, path).map_err(write_err)?;

    debug!("Saved {} contacts to {}", book.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty_book() {
        let dir = TempDir::new().unwrap();
        let book = load_book(&dir.path().join("absent.json")).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn save_then_load_preserves_contacts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(BOOK_FILE_NAME);

        let mut book = AddressBook::new();
        let mut record = Record::new("Alice").unwrap();
        record.add_phone("0123456789").unwrap();
        record.add_birthday("29.02.2000").unwrap();
        book.add_record(record);
        book.add_record(Record::new("Bob").unwrap());

        save_book(&book, &path).unwrap();
        let loaded = load_book(&path).unwrap();
        assert_eq!(loaded, book);
        assert!(!dir.path().join("nested/addressbook.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BOOK_FILE_NAME);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_book(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn invalid_phone_in_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BOOK_FILE_NAME);
        fs::write(
            &path,
            r#"{"version": 1, "contacts": [{"name": "A", "phones": ["12"]}]}"#,
        )
        .unwrap();
        assert!(matches!(load_book(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn unknown_version_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BOOK_FILE_NAME);
        fs::write(&path, r#"{"version": 9, "contacts": []}"#).unwrap();
        assert!(matches!(
            load_book(&path),
            Err(StoreError::UnsupportedVersion { version: 9, .. })
        ));
    }
}
