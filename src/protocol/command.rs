// Application command codes carried in the command field of a wire word
//
// Conversation between a sensor node (client) and the surface unit (server):
//   client: Hi                  (payload: password)
//   server: RequestData         (no payload)
//   client: <sensor> command    (payload: sensor reading), repeated per sensor
//   client: Finished            (no payload)
//   server: SensorDataReceived  (payload: sensor count)

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Hi,
    RequestData,
    Finished,
    TempSensor,
    PressureSensor,
    ConductivitySensor,
    PhSensor,
    SensorDataReceived,
    /// Any code without a named variant
    Unknown(u8),
}

impl Command {
    /// All named commands, in code order
    pub const KNOWN: [Command; 8] = [
        Command::Hi,
        Command::RequestData,
        Command::Finished,
        Command::TempSensor,
        Command::PressureSensor,
        Command::ConductivitySensor,
        Command::PhSensor,
        Command::SensorDataReceived,
    ];

    /// Numeric code sent on the wire
    pub const fn code(self) -> u8 {
        match self {
            Command::Hi => 0,
            Command::RequestData => 1,
            Command::Finished => 2,
            Command::TempSensor => 3,
            Command::PressureSensor => 4,
            Command::ConductivitySensor => 5,
            Command::PhSensor => 6,
            Command::SensorDataReceived => 7,
            Command::Unknown(code) => code,
        }
    }

    /// Map a code to its command; never yields `Unknown` for a named code
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Command::Hi,
            1 => Command::RequestData,
            2 => Command::Finished,
            3 => Command::TempSensor,
            4 => Command::PressureSensor,
            5 => Command::ConductivitySensor,
            6 => Command::PhSensor,
            7 => Command::SensorDataReceived,
            other => Command::Unknown(other),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Command::Unknown(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Hi => "HI",
            Command::RequestData => "REQUEST_DATA",
            Command::Finished => "FINISHED",
            Command::TempSensor => "TEMP_SENSOR",
            Command::PressureSensor => "PRESSURE_SENSOR",
            Command::ConductivitySensor => "CONDUCTIVITY_SENSOR",
            Command::PhSensor => "PH_SENSOR",
            Command::SensorDataReceived => "SENSOR_DATA_RECEIVED",
            Command::Unknown(_) => "UNKNOWN",
        }
    }

    /// Look up a command by its name (case-insensitive) or numeric code
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(cmd) = Self::KNOWN
            .iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(s))
        {
            return Some(*cmd);
        }

        let code = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16).ok()?,
            None => s.parse::<u8>().ok()?,
        };
        Some(Self::from_code(code))
    }
}

impl From<u8> for Command {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd.code()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Unknown(code) => write!(f, "UNKNOWN({:#04x})", code),
            known => write!(f, "{}", known.name()),
        }
    }
}
