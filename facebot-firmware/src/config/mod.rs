//! Face configuration loading
//!
//! The firmware embeds face.toml at build time and parses it with a
//! small no_std parser.

pub mod toml;

pub use toml::{parse_face_config, BoardConfig, ParseError};
