//! Operator command parsing.

use staffdesk_core::types::DbId;

/// Usage text printed by `help` and after a parse error.
pub const HELP: &str = "\
Commands:
  approve <id>         approve pending request <id>
  assign <artist-id>   assign an artist to the approved request
  back | refresh       view other pending requests
  show                 redraw the current view
  help                 show this list
  quit | exit          leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Approve(DbId),
    Assign(DbId),
    ViewOtherRequests,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' needs an id")]
    MissingId { command: &'static str },

    #[error("'{value}' is not a valid id")]
    InvalidId { value: String },

    #[error("'{command}' takes no arguments")]
    UnexpectedArgument { command: &'static str },
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(ParseError::Unknown(format!("{head} ... {extra}")));
        }

        let command = match head.to_ascii_lowercase().as_str() {
            "approve" => Self::Approve(parse_id("approve", arg)?),
            "assign" => Self::Assign(parse_id("assign", arg)?),
            "back" | "refresh" => no_arg("back", arg, Self::ViewOtherRequests)?,
            "show" => no_arg("show", arg, Self::Show)?,
            "help" | "?" => no_arg("help", arg, Self::Help)?,
            "quit" | "exit" => no_arg("quit", arg, Self::Quit)?,
            _ => return Err(ParseError::Unknown(head.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_id(command: &'static str, arg: Option<&str>) -> Result<DbId, ParseError> {
    let value = arg.ok_or(ParseError::MissingId { command })?;
    value.parse().map_err(|_| ParseError::InvalidId {
        value: value.to_string(),
    })
}

fn no_arg(command: &'static str, arg: Option<&str>, parsed: Command) -> Result<Command, ParseError> {
    match arg {
        Some(_) => Err(ParseError::UnexpectedArgument { command }),
        None => Ok(parsed),
    }
}
