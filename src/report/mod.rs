//! M16 status report frame
//!
//! The modem answers a report request (`0x72` sent twice) with 18 bytes.
//! All multi-byte fields are big-endian. There is no checksum and no escaping.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       1B    start of frame
//! 1       2B    transport block counter
//! 3       1B    bit error rate
//! 4       1B    signal power
//! 5       1B    noise power
//! 6       2B    valid packet counter
//! 8       1B    invalid packet counter
//! 9       1B    firmware version
//! 10      3B    time since boot
//! 13      2B    chip id
//! 15      1B    status (hw_rev:2 | channel:4 | tb_valid:1 | tx_complete:1)
//! 16      1B    diagnostics (diagnostic:1 | reserved:1 | power_level:2 | reserved:4)
//! 17      1B    end of frame
//! ```
//!
//! Bitfields are listed from bit 0 (LSB) upwards.

use crate::bitwise::{bit_field, bit_flag, parse_u16_be, parse_u24_be, parse_u8};
use nom::IResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Report frame must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Malformed report frame: {0}")]
    Malformed(String),
}

/// Decoded M16 status report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub start_of_frame: u8,
    pub transport_block: u16,
    pub bit_error_rate: u8,
    pub signal_power: u8,
    pub noise_power: u8,
    pub packet_valid: u16,
    pub packet_invalid: u8,
    pub firmware_version: u8,
    /// 24-bit counter
    pub time_since_boot: u32,
    pub chip_id: u16,
    pub hw_rev: u8,
    pub channel: u8,
    pub tb_valid: bool,
    pub tx_complete: bool,
    pub diagnostic: bool,
    /// Bit 1 of the diagnostics byte
    pub reserved: bool,
    pub power_level: u8,
    /// Bits 4-7 of the diagnostics byte
    pub reserved2: u8,
    pub end_of_frame: u8,
}

impl Report {
    /// Frame length in bytes
    pub const LEN: usize = 18;

    /// Parse a complete report frame
    ///
    /// Anything but exactly [`Report::LEN`] bytes is rejected before any
    /// field is decoded.
    pub fn parse(bytes: &[u8]) -> Result<Self, ReportError> {
        if bytes.len() != Self::LEN {
            return Err(ReportError::Length {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }

        let (_, report) =
            parse_report(bytes).map_err(|e| ReportError::Malformed(e.to_string()))?;
        Ok(report)
    }
}

/// nom parser for the 18-byte frame
pub fn parse_report(input: &[u8]) -> IResult<&[u8], Report> {
    let (input, start_of_frame) = parse_u8(input)?;
    let (input, transport_block) = parse_u16_be(input)?;
    let (input, bit_error_rate) = parse_u8(input)?;
    let (input, signal_power) = parse_u8(input)?;
    let (input, noise_power) = parse_u8(input)?;
    let (input, packet_valid) = parse_u16_be(input)?;
    let (input, packet_invalid) = parse_u8(input)?;
    let (input, firmware_version) = parse_u8(input)?;
    let (input, time_since_boot) = parse_u24_be(input)?;
    let (input, chip_id) = parse_u16_be(input)?;
    let (input, status) = parse_u8(input)?;
    let (input, diagnostics) = parse_u8(input)?;
    let (input, end_of_frame) = parse_u8(input)?;

    let report = Report {
        start_of_frame,
        transport_block,
        bit_error_rate,
        signal_power,
        noise_power,
        packet_valid,
        packet_invalid,
        firmware_version,
        time_since_boot,
        chip_id,
        hw_rev: bit_field(status, 0, 2),
        channel: bit_field(status, 2, 4),
        tb_valid: bit_flag(status, 6),
        tx_complete: bit_flag(status, 7),
        diagnostic: bit_flag(diagnostics, 0),
        reserved: bit_flag(diagnostics, 1),
        power_level: bit_field(diagnostics, 2, 2),
        reserved2: bit_field(diagnostics, 4, 4),
        end_of_frame,
    };

    Ok((input, report))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transport Block: {}", self.transport_block)?;
        writeln!(f, "Bit Error Rate: {}", self.bit_error_rate)?;
        writeln!(f, "Signal Power: {}", self.signal_power)?;
        writeln!(f, "Noise Power: {}", self.noise_power)?;
        writeln!(f, "Packet Valid: {}", self.packet_valid)?;
        writeln!(f, "Packet Invalid: {}", self.packet_invalid)?;
        writeln!(f, "Firmware Version: {}", self.firmware_version)?;
        writeln!(f, "Time Since Boot: {}", self.time_since_boot)?;
        writeln!(f, "Chip ID: {:#06x}", self.chip_id)?;
        writeln!(f, "HW Rev: {}", self.hw_rev)?;
        writeln!(f, "Channel: {}", self.channel)?;
        writeln!(f, "TB Valid: {}", self.tb_valid)?;
        writeln!(f, "TX Complete: {}", self.tx_complete)?;
        writeln!(f, "Diagnostic: {}", self.diagnostic)?;
        write!(f, "Power Level: {}", self.power_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 18] = [
        0xAA, 0x01, 0x02, 0x10, 0x20, 0x30, 0x00, 0x05, 0x01, 0x03, 0x00, 0x01, 0x00, 0x12, 0x34,
        0b0101_0101, 0b0000_0101, 0x55,
    ];

    #[test]
    fn test_parse_sample_frame() {
        let report = Report::parse(&SAMPLE).unwrap();

        assert_eq!(report.start_of_frame, 0xAA);
        assert_eq!(report.transport_block, 0x0102);
        assert_eq!(report.bit_error_rate, 0x10);
        assert_eq!(report.signal_power, 0x20);
        assert_eq!(report.noise_power, 0x30);
        assert_eq!(report.packet_valid, 0x0005);
        assert_eq!(report.packet_invalid, 0x01);
        assert_eq!(report.firmware_version, 0x03);
        assert_eq!(report.time_since_boot, 0x000100);
        assert_eq!(report.chip_id, 0x1234);
        assert_eq!(report.hw_rev, 1);
        assert_eq!(report.channel, 5);
        // 0b0101_0101 has bit 6 set
        assert!(report.tb_valid);
        assert!(!report.tx_complete);
        assert!(report.diagnostic);
        assert!(!report.reserved);
        assert_eq!(report.power_level, 1);
        assert_eq!(report.reserved2, 0);
        assert_eq!(report.end_of_frame, 0x55);
    }

    #[test]
    fn test_parse_status_bits() {
        let mut frame = SAMPLE;
        frame[15] = 0b1011_1110;
        frame[16] = 0b1010_1110;
        let report = Report::parse(&frame).unwrap();

        assert_eq!(report.hw_rev, 0b10);
        assert_eq!(report.channel, 0b1111);
        assert!(!report.tb_valid);
        assert!(report.tx_complete);
        assert!(!report.diagnostic);
        assert!(report.reserved);
        assert_eq!(report.power_level, 0b11);
        assert_eq!(report.reserved2, 0b1010);

        frame[15] = 0b0100_0000;
        let report = Report::parse(&frame).unwrap();
        assert!(report.tb_valid);
        assert!(!report.tx_complete);
        assert_eq!(report.hw_rev, 0);
        assert_eq!(report.channel, 0);
    }

    #[test]
    fn test_time_since_boot_is_24_bit_big_endian() {
        let mut frame = SAMPLE;
        frame[10..13].copy_from_slice(&[0xFE, 0xDC, 0xBA]);
        let report = Report::parse(&frame).unwrap();
        assert_eq!(report.time_since_boot, 0xFEDCBA);
    }

    #[test]
    fn test_length_guard() {
        for len in [0usize, 1, 17, 19, 36] {
            let buf = vec![0xAA; len];
            assert_eq!(
                Report::parse(&buf),
                Err(ReportError::Length {
                    expected: 18,
                    actual: len
                })
            );
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        // Every field depends only on its own bytes
        let mut frame = [0u8; 18];
        for seed in 0..=u8::MAX {
            for (i, b) in frame.iter_mut().enumerate() {
                *b = seed.wrapping_mul(31).wrapping_add((i as u8).wrapping_mul(17));
            }
            let first = Report::parse(&frame).unwrap();
            let second = Report::parse(&frame).unwrap();
            assert_eq!(first, second);

            assert_eq!(first.start_of_frame, frame[0]);
            assert_eq!(first.transport_block, u16::from_be_bytes([frame[1], frame[2]]));
            assert_eq!(first.packet_valid, u16::from_be_bytes([frame[6], frame[7]]));
            assert_eq!(
                first.time_since_boot,
                (frame[10] as u32) << 16 | (frame[11] as u32) << 8 | frame[12] as u32
            );
            assert_eq!(first.chip_id, u16::from_be_bytes([frame[13], frame[14]]));
            assert_eq!(first.hw_rev, frame[15] & 0b0000_0011);
            assert_eq!(first.channel, (frame[15] & 0b0011_1100) >> 2);
            assert_eq!(first.tb_valid, frame[15] & 0b0100_0000 != 0);
            assert_eq!(first.tx_complete, frame[15] & 0b1000_0000 != 0);
            assert_eq!(first.diagnostic, frame[16] & 0b0000_0001 != 0);
            assert_eq!(first.power_level, (frame[16] & 0b0000_1100) >> 2);
            assert_eq!(first.end_of_frame, frame[17]);
        }
    }

    #[test]
    fn test_report_json() {
        let report = Report::parse(&SAMPLE).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["chip_id"], 0x1234);
        assert_eq!(json["channel"], 5);
        assert_eq!(json["diagnostic"], true);

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_display_lists_fields() {
        let text = Report::parse(&SAMPLE).unwrap().to_string();
        assert!(text.contains("Transport Block: 258"));
        assert!(text.contains("Chip ID: 0x1234"));
        assert!(text.contains("Channel: 5"));
        assert!(text.ends_with("Power Level: 1"));
    }
}
