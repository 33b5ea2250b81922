// M16-RS: driver and message codec for the M16 modem

pub mod bitwise;
pub mod core;
pub mod drivers;
pub mod protocol;
pub mod report;
pub mod serial;

// Re-export commonly used types
pub use drivers::{M16Modem, ModemError, ModemResult};
pub use protocol::{BitLayout, Codec, CodecError, Command, Message, WireWord};
pub use report::{Report, ReportError};
pub use serial::{RetryPolicy, SerialConfig, SerialError, SerialPort, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
