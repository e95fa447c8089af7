//! Minimal TOML parser for face.toml
//!
//! Handles only the subset face.toml uses. It does NOT support the full
//! TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use facebot_core::{FaceConfig, Rgb565};

use crate::budget::framebuffer_fits;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Unknown key in a known section
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Invalid `#RRGGBB` colour
    InvalidColor,
    /// [display] section or its dimensions are missing
    MissingDisplay,
    /// The framebuffer for these dimensions does not fit the heap
    FramebufferTooLarge,
    /// Parsed values fail face configuration validation
    Invalid(facebot_core::config::ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Timing,
    Palette,
    Hearts,
}

/// Settings read from face.toml
#[derive(Debug, Clone, Copy)]
pub struct BoardConfig {
    pub face: FaceConfig,
    /// Backlight state at boot
    pub backlight: bool,
}

/// Overrides collected before the screen size is known
#[derive(Default)]
struct Overrides {
    width: Option<u16>,
    height: Option<u16>,
    backlight: Option<bool>,
    frame_ms: Option<u32>,
    blink_ms: Option<u32>,
    max_visible: Option<u8>,
    colors: [Option<Rgb565>; PALETTE_KEYS.len()],
}

const PALETTE_KEYS: [&str; 8] = [
    "background",
    "eye_white",
    "pupil",
    "highlight",
    "mouth",
    "mouth_interior",
    "heart_a",
    "heart_b",
];

/// Parse face.toml into a validated board configuration
///
/// Geometry always comes from [`FaceConfig::for_screen`]; the file only
/// overrides colours, timing and the heart count.
pub fn parse_face_config(input: &str) -> Result<BoardConfig, ParseError> {
    let mut section = Section::Root;
    let mut overrides = Overrides::default();

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut overrides)?;
        }
    }

    let (Some(width), Some(height)) = (overrides.width, overrides.height) else {
        return Err(ParseError::MissingDisplay);
    };

    let mut face = FaceConfig::for_screen(width, height);
    if let Some(frame_ms) = overrides.frame_ms {
        face.timing.frame_ms = frame_ms;
    }
    if let Some(blink_ms) = overrides.blink_ms {
        face.timing.blink_ms = blink_ms;
    }
    if let Some(max_visible) = overrides.max_visible {
        face.hearts.max_visible = max_visible;
    }

    let palette = &mut face.palette;
    let slots = [
        &mut palette.background,
        &mut palette.eye_white,
        &mut palette.pupil,
        &mut palette.highlight,
        &mut palette.mouth,
        &mut palette.mouth_interior,
        &mut palette.heart_a,
        &mut palette.heart_b,
    ];
    for (slot, color) in slots.into_iter().zip(overrides.colors) {
        if let Some(color) = color {
            *slot = color;
        }
    }

    face.validate().map_err(ParseError::Invalid)?;
    if !framebuffer_fits(face.pixel_count()) {
        return Err(ParseError::FramebufferTooLarge);
    }

    Ok(BoardConfig {
        face,
        backlight: overrides.backlight.unwrap_or(true),
    })
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        "palette" => Ok(Section::Palette),
        "hearts" => Ok(Section::Hearts),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    overrides: &mut Overrides,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Display, "width") => overrides.width = Some(parse_int(value)?),
        (Section::Display, "height") => overrides.height = Some(parse_int(value)?),
        (Section::Display, "backlight") => overrides.backlight = Some(parse_bool(value)?),
        (Section::Timing, "frame_ms") => overrides.frame_ms = Some(parse_int(value)?),
        (Section::Timing, "blink_ms") => overrides.blink_ms = Some(parse_int(value)?),
        (Section::Hearts, "max_visible") => overrides.max_visible = Some(parse_int(value)?),
        (Section::Palette, name) => {
            let index = PALETTE_KEYS
                .iter()
                .position(|k| *k == name)
                .ok_or(ParseError::UnknownKey)?;
            let color = Rgb565::from_hex(parse_string(value)).ok_or(ParseError::InvalidColor)?;
            overrides.colors[index] = Some(color);
        }
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse a key = value line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments, keeping `#` inside quoted colours
    let value = if let Some(hash_pos) = value.rfind('#') {
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
