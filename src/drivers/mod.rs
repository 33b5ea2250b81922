// Modem drivers built on the serial transport
pub mod error;
pub mod m16;

pub use error::{ModemError, ModemResult};
pub use m16::{channel_char, power_level_char, M16Modem};
