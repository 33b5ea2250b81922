// Serial port transport for the M16
// Wraps the serialport crate behind the Transport trait

use super::transport::Transport;
use crate::core::M16_BAUD;
use std::io::{self, Read, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerialError {
    #[error("Serial port error: {0}")]
    Port(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SerialError>;

/// Serial port configuration
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate (the M16 ships at 9600)
    pub baud_rate: u32,

    /// Data bits (5, 6, 7, 8)
    pub data_bits: serialport::DataBits,

    /// Stop bits
    pub stop_bits: serialport::StopBits,

    /// Parity
    pub parity: serialport::Parity,

    /// Flow control
    pub flow_control: serialport::FlowControl,

    /// Timeout of a single blocking read/write on the OS handle
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: M16_BAUD,
            data_bits: serialport::DataBits::Eight,
            stop_bits: serialport::StopBits::One,
            parity: serialport::Parity::None,
            flow_control: serialport::FlowControl::None,
            timeout: Duration::from_millis(100),
        }
    }
}

impl SerialConfig {
    /// Create a new configuration with specified baud rate
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings before opening a port
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(SerialError::InvalidConfig(
                "baud rate must be non-zero".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(SerialError::InvalidConfig(
                "timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Serial port connected to an M16
pub struct SerialPort {
    port: Box<dyn serialport::SerialPort>,
    config: SerialConfig,
    port_name: String,
}

impl SerialPort {
    /// Open a serial port with the given configuration
    pub fn open(port_name: &str, config: SerialConfig) -> Result<Self> {
        config.validate()?;

        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .parity(config.parity)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|e| SerialError::Port(e.to_string()))?;

        tracing::debug!("Opened {} at {} baud", port_name, config.baud_rate);

        Ok(Self {
            port,
            config,
            port_name: port_name.to_string(),
        })
    }

    /// Get the port name
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Get the configuration
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Close the port, releasing the OS handle
    pub fn close(self) {
        tracing::debug!("Closed {}", self.port_name);
    }
}

impl Transport for SerialPort {
    async fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let port = &mut self.port;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    async fn try_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = &mut self.port;
        let available = port
            .bytes_to_read()
            .map_err(|e| SerialError::Port(e.to_string()))? as usize;
        if available == 0 || buf.is_empty() {
            return Ok(0);
        }

        let len = available.min(buf.len());
        match port.read(&mut buf[..len]) {
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(SerialError::Io(e)),
        }
    }

    async fn bytes_available(&mut self) -> Result<usize> {
        let port = &mut self.port;
        port.bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| SerialError::Port(e.to_string()))
    }

    async fn clear_input(&mut self) -> Result<()> {
        let port = &mut self.port;
        port.clear(serialport::ClearBuffer::Input)
            .map_err(|e| SerialError::Port(e.to_string()))
    }
}

/// List available serial ports
pub fn list_ports() -> Result<Vec<String>> {
    serialport::available_ports()
        .map_err(|e| SerialError::Port(e.to_string()))?
        .into_iter()
        .map(|p| Ok(p.port_name))
        .collect()
}
