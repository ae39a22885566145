use std::str::FromStr;

use crate::utils::error::AppError;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `join <room>`
    Join { room: String },
    /// `leave <room>`
    Leave { room: String },
    /// `say <user> <room> <text…>`; the text keeps its inner spacing.
    Say {
        user: String,
        room: String,
        text: String,
    },
    /// `delete <room>`
    Delete { room: String },
    /// `rooms`
    Rooms,
    /// `quit` or `exit`
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = split_word(line);

        match verb {
            "join" => Ok(Command::Join {
                room: single_arg(verb, rest)?,
            }),
            "leave" => Ok(Command::Leave {
                room: single_arg(verb, rest)?,
            }),
            "delete" => Ok(Command::Delete {
                room: single_arg(verb, rest)?,
            }),
            "say" => {
                let (user, rest) = split_word(rest);
                let (room, text) = split_word(rest);
                if user.is_empty() || room.is_empty() || text.is_empty() {
                    return Err(AppError::Command(
                        "usage: say <user> <room> <text>".to_string(),
                    ));
                }
                Ok(Command::Say {
                    user: user.to_string(),
                    room: room.to_string(),
                    text: text.to_string(),
                })
            }
            "rooms" => Ok(Command::Rooms),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(AppError::Command("empty line".to_string())),
            other => Err(AppError::Command(format!("unknown command `{other}`"))),
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn single_arg(verb: &str, rest: &str) -> Result<String, AppError> {
    let rest = rest.trim();
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(AppError::Command(format!("usage: {verb} <room>")));
    }
    Ok(rest.to_string())
}
