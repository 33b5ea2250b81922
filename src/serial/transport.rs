// Byte transport abstraction shared by the real serial port and the mock
// Reads are non-blocking polls; waiting is delegated to an injected Delay

use super::comm::{Result, SerialError};
use crate::core::{MAX_POLL_RETRIES, POLL_INTERVAL};
use std::time::Duration;

/// Byte-oriented link to the modem
pub trait Transport {
    /// Write all bytes
    async fn send_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Write a single byte
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        self.send_bytes(&[byte]).await
    }

    /// Read whatever is already buffered, up to `buf.len()` bytes
    /// Returns 0 when nothing has arrived; must not block waiting for data
    async fn try_read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Number of bytes waiting in the receive buffer
    async fn bytes_available(&mut self) -> Result<usize>;

    /// Discard everything in the receive buffer
    async fn clear_input(&mut self) -> Result<()>;
}

/// Source of waits between polls and command bytes
pub trait Delay {
    async fn delay(&mut self, duration: Duration);
}

/// Wall-clock delay backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    async fn delay(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll schedule for [`read_exactly`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait after each poll that returned nothing
    pub poll_interval: Duration,

    /// Empty polls tolerated before giving up
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            max_retries: MAX_POLL_RETRIES,
        }
    }
}

impl RetryPolicy {
    pub fn new(poll_interval: Duration, max_retries: u32) -> Self {
        Self {
            poll_interval,
            max_retries,
        }
    }

    /// Upper bound on the time spent waiting
    pub fn deadline(&self) -> Duration {
        self.poll_interval * self.max_retries
    }
}

/// Collect exactly `count` bytes or fail
///
/// Every poll that yields nothing counts against the budget, including
/// polls after partial progress. Once more than `max_retries` polls came back
/// empty the read fails with [`SerialError::Timeout`] and the partial data is
/// dropped.
pub async fn read_exactly<T, D>(
    transport: &mut T,
    delay: &mut D,
    count: usize,
    policy: RetryPolicy,
) -> Result<Vec<u8>>
where
    T: Transport,
    D: Delay,
{
    let mut buf = vec![0u8; count];
    let mut total_read = 0;
    let mut retries = 0u32;

    while total_read < count {
        let n = transport.try_read(&mut buf[total_read..]).await?;
        if n > 0 {
            total_read += n;
            continue;
        }

        retries += 1;
        if retries > policy.max_retries {
            tracing::debug!(
                "Read timed out with {}/{} bytes after {} polls",
                total_read,
                count,
                retries
            );
            return Err(SerialError::Timeout(policy.deadline()));
        }
        delay.delay(policy.poll_interval).await;
    }

    Ok(buf)
}
