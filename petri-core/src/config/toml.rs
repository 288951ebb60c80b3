//! Minimal TOML parser for `petri.toml`
//!
//! Handles only the subset the firmware configuration needs, without
//! allocating. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - `[display]`, `[seed]` and `[overlay]` section headers
//! - Key = value pairs (integer, boolean)
//! - Integers in decimal or `0x` hex, with `_` separators
//! - Flat integer arrays: `channels = [0, 1, 2, 3]`
//! - Comments (# ...)
//!
//! Keys that are not set keep their default value.

use super::types::{ConfigError, PetriConfig, MAX_SEED_CHANNELS};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (1-based line number)
    InvalidSection(usize),
    /// Key not valid in its section (1-based line number)
    UnknownKey(usize),
    /// Line is not `key = value` or the value has the wrong type
    InvalidValue(usize),
    /// Array longer than the configuration can hold
    TooManyItems(usize),
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Seed,
    Overlay,
}

/// Parse TOML configuration into a validated [`PetriConfig`]
pub fn parse_config(input: &str) -> Result<PetriConfig, ParseError> {
    let mut config = PetriConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line).ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue(line_no))?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    config.validate().map_err(ParseError::Invalid)?;
    Ok(config)
}

/// Drop a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse a header like `[display]`
fn parse_section_header(line: &str) -> Option<Section> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    match name {
        "display" => Some(Section::Display),
        "seed" => Some(Section::Seed),
        "overlay" => Some(Section::Overlay),
        _ => None,
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an unsigned integer (decimal or `0x` hex, `_` separators allowed)
fn parse_u32(value: &str) -> Option<u32> {
    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    let mut result: u32 = 0;
    let mut seen_digit = false;
    for ch in digits.chars() {
        if ch == '_' {
            continue;
        }
        let digit = ch.to_digit(radix)?;
        result = result.checked_mul(radix)?.checked_add(digit)?;
        seen_digit = true;
    }

    seen_digit.then_some(result)
}

/// Parse an integer that must fit in a byte
fn parse_u8(value: &str) -> Option<u8> {
    parse_u32(value).and_then(|v| u8::try_from(v).ok())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse `[a, b, c]` into byte-sized channel numbers
fn parse_channels(
    value: &str,
    line_no: usize,
) -> Result<heapless::Vec<u8, MAX_SEED_CHANNELS>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue(line_no))?;

    let mut channels = heapless::Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Allow a trailing comma
        if item.is_empty() {
            continue;
        }
        let channel = parse_u8(item).ok_or(ParseError::InvalidValue(line_no))?;
        channels
            .push(channel)
            .map_err(|_| ParseError::TooManyItems(line_no))?;
    }

    Ok(channels)
}

/// Store one value into the configuration
fn apply_value(
    config: &mut PetriConfig,
    section: Section,
    key: &str,
    value: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue(line_no);

    match (section, key) {
        (Section::Display, "address") => {
            config.display.i2c_address = parse_u8(value).ok_or(invalid)?;
        }
        (Section::Display, "frequency") => {
            config.display.i2c_frequency = parse_u32(value).ok_or(invalid)?;
        }
        (Section::Seed, "channels") => {
            config.seed.channels = parse_channels(value, line_no)?;
        }
        (Section::Seed, "max_polls") => {
            config.seed.max_polls = parse_u32(value).ok_or(invalid)?;
        }
        (Section::Seed, "fallback_seed") => {
            config.seed.fallback_seed = parse_u32(value).ok_or(invalid)?;
        }
        (Section::Overlay, "show_generation") => {
            config.overlay.show_generation = parse_bool(value).ok_or(invalid)?;
        }
        (Section::Overlay, "x") => {
            config.overlay.x = parse_u8(value).ok_or(invalid)?;
        }
        (Section::Overlay, "y") => {
            config.overlay.y = parse_u8(value).ok_or(invalid)?;
        }
        _ => return Err(ParseError::UnknownKey(line_no)),
    }

    Ok(())
}
