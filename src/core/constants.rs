// Constants of the M16 modem command interface

use std::time::Duration;

/// Default UART baud rate of the M16
pub const M16_BAUD: u32 = 9600;

/// Toggle between transparent mode and command mode (modem boots transparent)
pub const CMD_SWITCH_MODE: u8 = 0x6D;

/// Select a communication channel
pub const CMD_SET_CHANNEL: u8 = 0x63;

/// Select the transmit power level
pub const CMD_SET_POWER: u8 = 0x6C;

/// Request an 18-byte status report
pub const CMD_REQUEST_REPORT: u8 = 0x72;

/// Valid channel numbers
pub const CHANNEL_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

/// Valid power levels
pub const POWER_LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=4;

/// Pause between the two bytes of a doubled command
pub const COMMAND_REPEAT_DELAY: Duration = Duration::from_millis(1000);

/// Pause after the channel command before the channel character
pub const CHANNEL_SELECT_DELAY: Duration = Duration::from_millis(1);

/// Pause after the power command before the level character
pub const POWER_SELECT_DELAY: Duration = Duration::from_millis(1500);

/// Interval between polls while waiting for incoming bytes
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Empty polls tolerated before a read gives up
pub const MAX_POLL_RETRIES: u32 = 100;
