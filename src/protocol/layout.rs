// Bit layout configuration for the 16-bit wire word

use super::codec::CodecError;
use crate::bitwise::mask_u16;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref LAYOUT_RE: Regex =
        Regex::new(r"^\s*(\d{1,2})\s*/\s*(\d{1,2})\s*/\s*(\d{1,2})\s*$").expect("valid regex");
}

/// Split of the 16 wire bits among id, command and payload
///
/// Fields are packed from the most significant bit down:
///
/// ```text
/// | id (id_bits) | command (command_bits) | payload (payload_bits) |
/// 15                                                               0
/// ```
///
/// The historical layouts are not supersets of one another: the command
/// field starts at bit 10 in the 3/3/10 layout and at bit 8 in the 4/4/8
/// layout, so both ends of a link must agree on the preset in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitLayout {
    id_bits: u8,
    command_bits: u8,
    payload_bits: u8,
}

impl BitLayout {
    /// 4-bit id, 4-bit command, 8-bit payload (current firmware)
    pub const ID4_CMD4_DATA8: Self = Self::preset(4, 4, 8);

    /// 3-bit id, 3-bit command, 10-bit payload (earlier protocol revision)
    pub const ID3_CMD3_DATA10: Self = Self::preset(3, 3, 10);

    /// 3-bit id, 13-bit payload, no command field (raw packet framing)
    pub const ID3_DATA13: Self = Self::preset(3, 0, 13);

    /// All named presets
    pub const PRESETS: [Self; 3] = [
        Self::ID4_CMD4_DATA8,
        Self::ID3_CMD3_DATA10,
        Self::ID3_DATA13,
    ];

    const fn preset(id_bits: u8, command_bits: u8, payload_bits: u8) -> Self {
        Self {
            id_bits,
            command_bits,
            payload_bits,
        }
    }

    /// Create a validated layout
    ///
    /// The widths must add up to 16, the id must have between 1 and 8 bits,
    /// the command at most 8 bits and the payload at least 1 bit.
    pub fn new(id_bits: u8, command_bits: u8, payload_bits: u8) -> Result<Self, CodecError> {
        let total = id_bits as u32 + command_bits as u32 + payload_bits as u32;
        if total != 16 {
            return Err(CodecError::InvalidLayout(format!(
                "field widths {}/{}/{} sum to {} bits, expected 16",
                id_bits, command_bits, payload_bits, total
            )));
        }
        if id_bits == 0 || id_bits > 8 {
            return Err(CodecError::InvalidLayout(format!(
                "id width {} outside 1..=8",
                id_bits
            )));
        }
        if command_bits > 8 {
            return Err(CodecError::InvalidLayout(format!(
                "command width {} exceeds 8",
                command_bits
            )));
        }
        if payload_bits == 0 {
            return Err(CodecError::InvalidLayout(
                "payload needs at least one bit".to_string(),
            ));
        }

        Ok(Self::preset(id_bits, command_bits, payload_bits))
    }

    pub fn id_bits(&self) -> u8 {
        self.id_bits
    }

    pub fn command_bits(&self) -> u8 {
        self.command_bits
    }

    pub fn payload_bits(&self) -> u8 {
        self.payload_bits
    }

    /// Bit offset of the id field
    pub fn id_shift(&self) -> u8 {
        self.command_bits + self.payload_bits
    }

    /// Bit offset of the command field
    pub fn command_shift(&self) -> u8 {
        self.payload_bits
    }

    pub fn id_mask(&self) -> u16 {
        mask_u16(self.id_bits)
    }

    pub fn command_mask(&self) -> u16 {
        mask_u16(self.command_bits)
    }

    pub fn payload_mask(&self) -> u16 {
        mask_u16(self.payload_bits)
    }
}

impl Default for BitLayout {
    fn default() -> Self {
        Self::ID4_CMD4_DATA8
    }
}

impl fmt::Display for BitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.id_bits, self.command_bits, self.payload_bits
        )
    }
}

impl FromStr for BitLayout {
    type Err = CodecError;

    /// Parse an `id/command/payload` width triple such as `4/4/8`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LAYOUT_RE
            .captures(s)
            .ok_or_else(|| CodecError::InvalidLayoutSyntax(s.to_string()))?;

        let width = |i: usize| -> Result<u8, CodecError> {
            caps[i]
                .parse()
                .map_err(|_| CodecError::InvalidLayoutSyntax(s.to_string()))
        };

        Self::new(width(1)?, width(2)?, width(3)?)
    }
}

impl TryFrom<String> for BitLayout {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitLayout> for String {
    fn from(layout: BitLayout) -> Self {
        layout.to_string()
    }
}
