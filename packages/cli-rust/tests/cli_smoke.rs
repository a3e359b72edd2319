use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary pinned to config and book files inside `dir`
fn bot(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("assistant-bot").expect("bin");
    cmd.env("ASSISTANT_BOT_CONFIG", dir.join("config.json"))
        .env("ASSISTANT_BOT_BOOK", dir.join("addressbook.json"))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().expect("tempdir");
    bot(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("image"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn dockerfile_renders_default_recipe() {
    let dir = TempDir::new().expect("tempdir");
    bot(dir.path())
        .args(["image", "dockerfile"])
        .assert()
        .success()
        .stdout(
            "# Generated by assistant-bot\n\
             FROM python:3.13-slim\n\
             WORKDIR /app\n\
             COPY . /app\n\
             ENV PYTHONUNBUFFERED=1\n\
             CMD [\"python\", \"main.py\"]\n",
        );
}

#[test]
fn dockerfile_follows_config() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("config.json"),
        r#"{"image": {"workdir": "/srv/bot", "env": {"LANG": "C.UTF-8", "TZ": "UTC"}, "command": ["assistant-bot"]}}"#,
    )
    .expect("write config");

    bot(dir.path())
        .args(["image", "dockerfile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKDIR /srv/bot\nCOPY . /srv/bot\n"))
        .stdout(predicate::str::contains("ENV LANG=C.UTF-8\nENV TZ=UTC\n"))
        .stdout(predicate::str::contains("CMD [\"assistant-bot\"]"));
}

#[test]
fn dockerfile_rejects_relative_workdir() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("config.json"),
        r#"{"image": {"workdir": "app"}}"#,
    )
    .expect("write config");

    bot(dir.path())
        .args(["image", "dockerfile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("image.workdir"));
}

#[test]
fn malformed_config_fails() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("config.json"), "{ not json").expect("write config");

    bot(dir.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn chat_session_persists_contacts() {
    let dir = TempDir::new().expect("tempdir");

    bot(dir.path())
        .write_stdin("hello\nadd John 1234567890\nadd-birthday John 01.02.1990\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to the assistant bot!"))
        .stdout(predicate::str::contains("How can I help you?"))
        .stdout(predicate::str::contains("Contact added."))
        .stdout(predicate::str::contains("Good bye!"));

    assert!(dir.path().join("addressbook.json").exists());

    bot(dir.path())
        .arg("chat")
        .write_stdin("all\nclose\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Contact name: John, phones: 1234567890, birthday: 01.02.1990",
        ));
}

#[test]
fn chat_reports_errors_and_continues() {
    let dir = TempDir::new().expect("tempdir");

    bot(dir.path())
        .write_stdin("add John 12345\nphone Nobody\nfly\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: Phone must contain exactly 10 digits",
        ))
        .stdout(predicate::str::contains("Error: Contact not found"))
        .stdout(predicate::str::contains("Invalid command."));
}

#[test]
fn chat_saves_on_end_of_input() {
    let dir = TempDir::new().expect("tempdir");
    let book = dir.path().join("other.json");

    bot(dir.path())
        .args(["chat", "--book"])
        .arg(&book)
        .write_stdin("add Jane 0987654321\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Good bye!"));

    let saved = fs::read_to_string(&book).expect("book saved");
    assert!(saved.contains("0987654321"));
}

#[test]
fn config_reset_force_writes_defaults() {
    let dir = TempDir::new().expect("tempdir");

    bot(dir.path())
        .args(["config", "reset", "--force"])
        .assert()
        .success();

    let saved = fs::read_to_string(dir.path().join("config.json")).expect("config saved");
    assert!(saved.contains("python"));
    assert!(saved.contains("PYTHONUNBUFFERED"));

    bot(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"upcoming_days\": 7"));
}

#[test]
fn config_path_reports_overrides() {
    let dir = TempDir::new().expect("tempdir");

    bot(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("addressbook.json"));
}

#[test]
fn verbose_reports_version() {
    let dir = TempDir::new().expect("tempdir");

    bot(dir.path())
        .args(["-v", "config", "path"])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "assistant-bot {}",
            env!("CARGO_PKG_VERSION")
        )));
}
