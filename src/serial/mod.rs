// Serial transport for the M16 modem
pub mod comm;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use comm::{list_ports, SerialConfig, SerialError, SerialPort};
pub use transport::{read_exactly, Delay, RetryPolicy, TokioDelay, Transport};
