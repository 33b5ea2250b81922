// Mock transport and delay for testing without hardware

use super::comm::{Result, SerialError};
use super::transport::{Delay, Transport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock serial port for testing
#[derive(Clone, Default)]
pub struct MockSerialPort {
    /// Data ready to be read (simulates modem output already buffered)
    read_buffer: Arc<Mutex<VecDeque<u8>>>,

    /// Data arriving over time, one chunk per poll (an empty chunk is a quiet poll)
    arrivals: Arc<Mutex<VecDeque<Vec<u8>>>>,

    /// Data that was written (simulates commands sent to the modem)
    write_buffer: Arc<Mutex<Vec<u8>>>,

    /// Number of times the input buffer was cleared
    clears: Arc<Mutex<usize>>,

    /// Fail every write with this message
    write_error: Option<String>,
}

impl MockSerialPort {
    /// Create a new mock serial port
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail (simulates an unplugged adapter)
    pub fn with_write_error(mut self, message: impl Into<String>) -> Self {
        self.write_error = Some(message.into());
        self
    }

    /// Push data to be read (simulates the modem sending data)
    pub fn push_read_data(&mut self, data: &[u8]) {
        let mut buffer = self.read_buffer.lock().unwrap();
        buffer.extend(data.iter().copied());
    }

    /// Queue data that becomes readable one chunk per poll
    pub fn schedule_arrivals(&mut self, chunks: Vec<Vec<u8>>) {
        self.arrivals.lock().unwrap().extend(chunks);
    }

    /// Get data that was written
    pub fn get_written_data(&self) -> Vec<u8> {
        self.write_buffer.lock().unwrap().clone()
    }

    /// Clear written data
    pub fn clear_written_data(&mut self) {
        self.write_buffer.lock().unwrap().clear();
    }

    /// Check if a specific byte sequence was written
    pub fn was_written(&self, expected: &[u8]) -> bool {
        let buffer = self.write_buffer.lock().unwrap();
        buffer
            .windows(expected.len())
            .any(|window| window == expected)
    }

    /// Get number of bytes ready to read
    pub fn bytes_available(&self) -> usize {
        self.read_buffer.lock().unwrap().len()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }

    /// Move the next scheduled chunk into the read buffer (one poll)
    fn advance(&self) {
        if let Some(chunk) = self.arrivals.lock().unwrap().pop_front() {
            self.read_buffer.lock().unwrap().extend(chunk);
        }
    }
}

impl Transport for MockSerialPort {
    async fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(ref message) = self.write_error {
            return Err(SerialError::Port(message.clone()));
        }
        self.write_buffer.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }

    async fn try_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.read_buffer.lock().unwrap().is_empty() {
            self.advance();
        }

        let mut buffer = self.read_buffer.lock().unwrap();

        let mut count = 0;
        for item in buf.iter_mut() {
            match buffer.pop_front() {
                Some(byte) => {
                    *item = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    async fn bytes_available(&mut self) -> Result<usize> {
        self.advance();
        Ok(MockSerialPort::bytes_available(self))
    }

    async fn clear_input(&mut self) -> Result<()> {
        self.read_buffer.lock().unwrap().clear();
        *self.clears.lock().unwrap() += 1;
        Ok(())
    }
}

/// Delay that records requested waits and returns immediately
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    delays: Vec<Duration>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Sum of all requested waits
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }
}

impl Delay for RecordingDelay {
    async fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}

/// Helper to create a mock port with pre-loaded response data
pub fn mock_port_with_response(response: &[u8]) -> MockSerialPort {
    let mut port = MockSerialPort::new();
    port.push_read_data(response);
    port
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serial_basic() {
        let mut port = mock_port_with_response(b"Hello");

        let mut buf = [0u8; 5];
        assert_eq!(port.try_read(&mut buf).await.unwrap(), 5);
        assert_eq!(&buf, b"Hello");

        port.send_bytes(b"World").await.unwrap();
        port.send_byte(b'!').await.unwrap();
        assert_eq!(port.get_written_data(), b"World!");
    }

    #[tokio::test]
    async fn test_mock_empty_read_returns_zero() {
        let mut port = MockSerialPort::new();
        let mut buf = [0u8; 5];
        assert_eq!(port.try_read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mock_partial_read() {
        let mut port = mock_port_with_response(b"Hi");
        let mut buf = [0u8; 5];
        let n = port.try_read(&mut buf).await.unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..2], b"Hi");
    }

    #[tokio::test]
    async fn test_mock_arrivals_one_chunk_per_poll() {
        let mut port = MockSerialPort::new();
        port.schedule_arrivals(vec![vec![], b"ab".to_vec(), b"c".to_vec()]);

        let mut buf = [0u8; 4];
        assert_eq!(port.try_read(&mut buf).await.unwrap(), 0);
        assert_eq!(port.try_read(&mut buf).await.unwrap(), 2);
        assert_eq!(port.try_read(&mut buf).await.unwrap(), 1);
        assert_eq!(buf[0], b'c');
        assert_eq!(port.try_read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mock_availability_check_is_a_poll() {
        let mut port = MockSerialPort::new();
        port.schedule_arrivals(vec![vec![0x01], vec![], vec![0x02, 0x03]]);

        assert_eq!(Transport::bytes_available(&mut port).await.unwrap(), 1);
        assert_eq!(Transport::bytes_available(&mut port).await.unwrap(), 1);
        assert_eq!(Transport::bytes_available(&mut port).await.unwrap(), 3);
        assert_eq!(Transport::bytes_available(&mut port).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_mock_was_written() {
        let mut port = MockSerialPort::new();
        port.send_bytes(b"COMMAND123").await.unwrap();

        assert!(port.was_written(b"COMMAND"));
        assert!(port.was_written(b"123"));
        assert!(!port.was_written(b"NOTFOUND"));

        port.clear_written_data();
        assert!(port.get_written_data().is_empty());
    }

    #[tokio::test]
    async fn test_mock_clear_input() {
        let mut port = mock_port_with_response(&[1, 2, 3]);
        assert_eq!(Transport::bytes_available(&mut port).await.unwrap(), 3);

        port.clear_input().await.unwrap();
        assert_eq!(port.bytes_available(), 0);
        assert_eq!(port.clear_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_write_error() {
        let mut port = MockSerialPort::new().with_write_error("unplugged");
        assert!(matches!(
            port.send_byte(0x72).await,
            Err(SerialError::Port(_))
        ));
    }

    #[tokio::test]
    async fn test_recording_delay() {
        let mut delay = RecordingDelay::new();
        delay.delay(Duration::from_millis(1000)).await;
        delay.delay(Duration::from_millis(1)).await;
        assert_eq!(
            delay.delays(),
            &[Duration::from_millis(1000), Duration::from_millis(1)]
        );
        assert_eq!(delay.total(), Duration::from_millis(1001));
    }
}
