use std::fmt;
use uno::{Card, ValidationError};

/// A line typed by the player whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Hand,
    Top,
    Play { card: Card, said_uno: bool },
    Draw,
    Pass,
    Players,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace.
    Empty,
    /// `play` without a card.
    PlayMissingCard,
    /// The card after `play` couldn't be read.
    InvalidCard(ValidationError),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty command"),
            Self::PlayMissingCard => {
                write!(f, "Play requires a card (e.g., 'play red 7' or 'play w4 blue')")
            }
            Self::InvalidCard(err) => write!(f, "Invalid card: {err}"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command line into a [`Command`].
///
/// `play` takes the rest of the line as the card, with an optional trailing
/// `uno` to declare the last card.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    match trimmed.to_ascii_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "hand" | "h" => return Ok(Command::Hand),
        "top" | "t" => return Ok(Command::Top),
        "draw" | "d" => return Ok(Command::Draw),
        "pass" => return Ok(Command::Pass),
        "players" => return Ok(Command::Players),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.split_first() {
        Some((verb, rest)) if verb.eq_ignore_ascii_case("play") || *verb == "p" => {
            parse_play_command(rest)
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse the arguments of a play command: "play CARD [uno]"
fn parse_play_command(parts: &[&str]) -> Result<Command, ParseError> {
    let (card_parts, said_uno) = match parts.split_last() {
        Some((last, init)) if last.eq_ignore_ascii_case("uno") => (init, true),
        _ => (parts, false),
    };
    if card_parts.is_empty() {
        return Err(ParseError::PlayMissingCard);
    }
    let card = card_parts
        .join(" ")
        .parse::<Card>()
        .map_err(ParseError::InvalidCard)?;
    Ok(Command::Play { card, said_uno })
}
