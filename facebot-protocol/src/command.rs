//! Host commands.
//!
//! One JSON object per line with a `cmd` discriminator. Missing parameters
//! take their documented defaults and unknown fields are ignored, so hosts
//! can send extra keys without breaking older firmware.

use heapless::String;
use serde::Deserialize;

/// Maximum length of a colour string (`#RRGGBB` plus slack)
pub const COLOR_CAPACITY: usize = 16;

/// Errors that can occur while decoding a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line is not a JSON object of the expected shape
    BadJson,
    /// No `cmd` field
    MissingCommand,
    /// `cmd` names a command this firmware does not know
    UnknownCommand,
}

impl CommandError {
    /// Message reported to the host
    pub fn message(&self) -> &'static str {
        match self {
            CommandError::BadJson => "bad json",
            CommandError::MissingCommand => "no cmd",
            CommandError::UnknownCommand => "unknown cmd",
        }
    }
}

/// A decoded host command
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Enter (`on`) or leave face mode
    Face { on: bool },
    /// Set mouth openness (0 = smile, 1 = wide open)
    Mouth { open: f32 },
    /// Set love level (drives the number of floating hearts)
    Love { value: f32 },
    /// Blink once
    Blink,
    /// Fill the panel with a colour; `None` when absent
    Clear { color: Option<String<COLOR_CAPACITY>> },
    /// Switch the backlight
    Backlight { on: bool },
    /// Report face state
    Status,
}

#[derive(Deserialize)]
struct RawCommand<'a> {
    #[serde(borrow)]
    cmd: Option<&'a str>,
    on: Option<bool>,
    open: Option<f32>,
    value: Option<f32>,
    #[serde(borrow)]
    color: Option<&'a str>,
}

impl Command {
    /// Decode a command from one line of JSON
    pub fn parse(line: &[u8]) -> Result<Self, CommandError> {
        let (raw, _) =
            serde_json_core::from_slice::<RawCommand>(line).map_err(|_| CommandError::BadJson)?;

        let name = raw.cmd.ok_or(CommandError::MissingCommand)?;
        let command = match name {
            "face" => Command::Face {
                on: raw.on.unwrap_or(false),
            },
            "mouth" => Command::Mouth {
                open: raw.open.unwrap_or(0.0),
            },
            "love" => Command::Love {
                value: raw.value.unwrap_or(0.0),
            },
            "blink" => Command::Blink,
            "clear" => Command::Clear {
                // Oversized strings cannot be a valid colour either
                color: raw.color.and_then(|c| String::try_from(c).ok()),
            },
            "bl" => Command::Backlight {
                on: raw.on.unwrap_or(true),
            },
            "status" => Command::Status,
            _ => return Err(CommandError::UnknownCommand),
        };
        Ok(command)
    }

    /// Wire name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Face { .. } => "face",
            Command::Mouth { .. } => "mouth",
            Command::Love { .. } => "love",
            Command::Blink => "blink",
            Command::Clear { .. } => "clear",
            Command::Backlight { .. } => "bl",
            Command::Status => "status",
        }
    }
}
