//! REPL input parsing.

use charla_core::session::ConversationMode;
use std::path::PathBuf;

/// Slash commands offered by completion and hints.
pub const COMMANDS: &[&str] = &[
    "/mode", "/reset", "/attach", "/detach", "/history", "/help", "/quit",
];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text for the assistant.
    Message(String),
    /// `/mode [amigo|profesor]`; without an argument the mode toggles.
    Mode(Option<ConversationMode>),
    Reset,
    Attach(PathBuf),
    Detach,
    History,
    Help,
    Quit,
    /// A slash command that could not be understood.
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed == "quit" || trimmed == "exit" {
        return Command::Quit;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message(trimmed.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "mode" if arg.is_empty() => Command::Mode(None),
        "mode" => match arg.parse() {
            Ok(mode) => Command::Mode(Some(mode)),
            Err(err) => Command::Invalid(err.to_string()),
        },
        "reset" => Command::Reset,
        "attach" if arg.is_empty() => Command::Invalid("usage: /attach <path>".to_string()),
        "attach" => Command::Attach(PathBuf::from(arg)),
        "detach" => Command::Detach,
        "history" => Command::History,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command /{other}")),
    }
}
