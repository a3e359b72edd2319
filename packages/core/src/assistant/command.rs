//! Console command parsing

use thiserror::Error;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hello,
    Help,
    Add { name: String, phone: String },
    Change {
        name: String,
        old_phone: String,
        new_phone: String,
    },
    Phone { name: String },
    All,
    AddBirthday { name: String, birthday: String },
    ShowBirthday { name: String },
    Birthdays,
    Exit,
    Unknown(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Split a line into a lowercased command word and its arguments
///
/// Returns `None` for blank lines.
pub fn split_input(line: &str) -> Option<(String, Vec<&str>)> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_lowercase();
    Some((command, parts.collect()))
}

fn exactly<const N: usize>(args: &[&str], usage: &'static str) -> Result<[String; N], CommandError> {
    if args.len() != N {
        return Err(CommandError::Usage(usage));
    }
    Ok(std::array::from_fn(|i| args[i].to_string()))
}

fn first(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    args.first()
        .map(|arg| arg.to_string())
        .ok_or(CommandError::Usage(usage))
}

/// Parse one input line
///
/// `Ok(None)` means the line was blank.
pub fn parse_input(line: &str) -> Result<Option<Command>, CommandError> {
    let Some((word, args)) = split_input(line) else {
        return Ok(None);
    };

    let command = match word.as_str() {
        "exit" | "close" => Command::Exit,
        "hello" => Command::Hello,
        "help" => Command::Help,
        "add" => {
            let [name, phone] = exactly::<2>(&args, "add <name> <phone>")?;
            Command::Add { name, phone }
        }
        "change" => {
            let [name, old_phone, new_phone] =
                exactly::<3>(&args, "change <name> <old_phone> <new_phone>")?;
            Command::Change {
                name,
                old_phone,
                new_phone,
            }
        }
        "phone" => Command::Phone {
            name: first(&args, "phone <name>")?,
        },
        "all" => Command::All,
        "add-birthday" => {
            let [name, birthday] = exactly::<2>(&args, "add-birthday <name> <DD.MM.YYYY>")?;
            Command::AddBirthday { name, birthday }
        }
        "show-birthday" => Command::ShowBirthday {
            name: first(&args, "show-birthday <name>")?,
        },
        "birthdays" => Command::Birthdays,
        _ => Command::Unknown(word),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse_input("   ").unwrap(), None);
        assert_eq!(parse_input("").unwrap(), None);
    }

    #[test]
    fn command_word_is_case_insensitive() {
        assert_eq!(parse_input("HeLLo").unwrap(), Some(Command::Hello));
        assert_eq!(parse_input("CLOSE").unwrap(), Some(Command::Exit));
    }

    #[test]
    fn arguments_keep_their_case() {
        assert_eq!(
            parse_input("add Alice 0123456789").unwrap(),
            Some(Command::Add {
                name: "Alice".to_string(),
                phone: "0123456789".to_string(),
            })
        );
    }

    #[test]
    fn add_requires_exactly_two_arguments() {
        assert_eq!(
            parse_input("add Alice"),
            Err(CommandError::Usage("add <name> <phone>"))
        );
        assert!(parse_input("add Alice 0123456789 extra").is_err());
    }

    #[test]
    fn change_requires_three_arguments() {
        let err = parse_input("change Alice 0123456789").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Usage: change <name> <old_phone> <new_phone>"
        );
    }

    #[test]
    fn phone_ignores_extra_arguments() {
        assert_eq!(
            parse_input("phone Alice Bob").unwrap(),
            Some(Command::Phone {
                name: "Alice".to_string()
            })
        );
        assert!(parse_input("phone").is_err());
    }

    #[test]
    fn unknown_command_is_preserved() {
        assert_eq!(
            parse_input("dance now").unwrap(),
            Some(Command::Unknown("dance".to_string()))
        );
    }
}
