//! Text command parsing
//!
//! One command per line:
//!
//! ```text
//! start | stop | click | theme | quit | help
//! preset <box|478|personal>
//! +<field> [steps]    -<field> [steps]
//! ```
//!
//! Fields are `in`, `hold`, `out`, `hold2` and `min`.

use core::fmt;

use breathe_core::config::{Field, PresetName};
use breathe_core::Command;

/// Largest step accepted in one adjustment
pub const MAX_STEPS: i16 = 60;

/// One parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Forward to the widget
    Command(Command),
    /// Print the command list
    Help,
    /// Stop and exit
    Quit,
}

/// Errors that can occur when parsing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    Empty,
    /// First word is not a command
    UnknownCommand,
    /// `preset` without a known preset name
    UnknownPreset,
    /// `+`/`-` without a known field
    UnknownField,
    /// Step count is not a number in range
    BadStep,
    /// Extra words after a complete command
    TrailingInput,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseError::Empty => "empty line",
            ParseError::UnknownCommand => "unknown command (try `help`)",
            ParseError::UnknownPreset => "unknown preset (box, 478, personal)",
            ParseError::UnknownField => "unknown field (in, hold, out, hold2, min)",
            ParseError::BadStep => "step must be a number from 1 to 60",
            ParseError::TrailingInput => "unexpected input after command",
        };
        f.write_str(text)
    }
}

/// Command reference printed by `help`
pub const HELP: &str = "\
commands:
  start | click       begin a session
  stop                end the session, or dismiss a finished one
  preset <name>       box, 478 or personal
  +<field> [n]        raise in, hold, out, hold2 or min
  -<field> [n]        lower a field
  theme               next colour theme
  quit                exit";

/// Parse one input line
pub fn parse(line: &str) -> Result<Input, ParseError> {
    let mut words = line.split_whitespace();
    let first = words.next().ok_or(ParseError::Empty)?;

    let input = match first {
        "start" => Input::Command(Command::Start),
        "stop" => Input::Command(Command::Stop),
        "click" => Input::Command(Command::Click),
        "theme" => Input::Command(Command::CycleTheme),
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        "preset" => {
            let name = words.next().ok_or(ParseError::UnknownPreset)?;
            let preset = PresetName::from_name(name).ok_or(ParseError::UnknownPreset)?;
            Input::Command(Command::SelectPreset(preset))
        }
        _ => {
            let (sign, field) = if let Some(field) = first.strip_prefix('+') {
                (1, field)
            } else if let Some(field) = first.strip_prefix('-') {
                (-1, field)
            } else {
                return Err(ParseError::UnknownCommand);
            };
            let field = Field::from_name(field).ok_or(ParseError::UnknownField)?;
            let steps = match words.next() {
                Some(word) => parse_steps(word)?,
                None => 1,
            };
            Input::Command(Command::Adjust(field, sign * steps))
        }
    };

    if words.next().is_some() {
        return Err(ParseError::TrailingInput);
    }
    Ok(input)
}

fn parse_steps(word: &str) -> Result<i16, ParseError> {
    match word.parse::<i16>() {
        Ok(steps) if (1..=MAX_STEPS).contains(&steps) => Ok(steps),
        _ => Err(ParseError::BadStep),
    }
}
