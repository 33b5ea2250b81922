// M16 modem driver
//
// The modem starts in transparent mode: every byte written is transmitted.
// Configuration commands are single ASCII bytes sent twice with a one second
// pause, optionally followed by an argument character.

use super::error::{ModemError, ModemResult};
use crate::core::{
    CHANNEL_RANGE, CHANNEL_SELECT_DELAY, CMD_REQUEST_REPORT, CMD_SET_CHANNEL, CMD_SET_POWER,
    CMD_SWITCH_MODE, COMMAND_REPEAT_DELAY, POWER_LEVEL_RANGE, POWER_SELECT_DELAY,
};
use crate::protocol::{BitLayout, Codec, Message, WireWord};
use crate::report::Report;
use crate::serial::{read_exactly, Delay, RetryPolicy, TokioDelay, Transport};

/// Character selecting `channel`: '1'..'9' for 1-9, 'a'..'c' for 10-12
pub fn channel_char(channel: u8) -> Option<u8> {
    match channel {
        1..=9 => Some(b'0' + channel),
        10..=12 => Some(b'a' + (channel - 10)),
        _ => None,
    }
}

/// Character selecting power `level`: '1'..'4'
pub fn power_level_char(level: u8) -> Option<u8> {
    if POWER_LEVEL_RANGE.contains(&level) {
        Some(b'0' + level)
    } else {
        None
    }
}

/// M16 modem on top of a byte transport
///
/// The transport and delay source are injected so the command scripts can be
/// driven against a mock port without real waits.
pub struct M16Modem<T: Transport, D: Delay = TokioDelay> {
    transport: T,
    delay: D,
    codec: Codec,
    retry: RetryPolicy,
    last_report: Option<Report>,
}

impl<T: Transport> M16Modem<T, TokioDelay> {
    /// Create a modem using wall-clock delays
    pub fn new(transport: T, layout: BitLayout) -> Self {
        Self::with_delay(transport, TokioDelay, layout)
    }
}

impl<T: Transport, D: Delay> M16Modem<T, D> {
    pub fn with_delay(transport: T, delay: D, layout: BitLayout) -> Self {
        Self {
            transport,
            delay,
            codec: Codec::new(layout),
            retry: RetryPolicy::default(),
            last_report: None,
        }
    }

    /// Override the poll schedule used for incoming data
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn layout(&self) -> BitLayout {
        self.codec.layout()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn delay_source(&self) -> &D {
        &self.delay
    }

    /// Most recent report received by [`M16Modem::request_report`]
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    pub fn into_inner(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Send a command byte, wait, then send it again
    async fn send_doubled(&mut self, command: u8) -> ModemResult<()> {
        self.transport.send_byte(command).await?;
        self.delay.delay(COMMAND_REPEAT_DELAY).await;
        self.transport.send_byte(command).await?;
        Ok(())
    }

    /// Toggle between transparent and command mode
    pub async fn switch_operation_mode(&mut self) -> ModemResult<()> {
        tracing::info!("Switching M16 operation mode");
        self.send_doubled(CMD_SWITCH_MODE).await
    }

    /// Select channel 1-12
    ///
    /// Out-of-range channels are ignored: nothing is sent and `Ok(())` is
    /// returned, which is how the modem library has always behaved.
    pub async fn set_channel(&mut self, channel: u8) -> ModemResult<()> {
        let Some(selector) = channel_char(channel) else {
            tracing::warn!(
                "Ignoring channel {} (valid {:?})",
                channel,
                CHANNEL_RANGE
            );
            return Ok(());
        };

        tracing::info!("Setting M16 channel to {}", channel);
        self.send_doubled(CMD_SET_CHANNEL).await?;
        self.delay.delay(CHANNEL_SELECT_DELAY).await;
        self.transport.send_byte(selector).await?;
        Ok(())
    }

    /// Select power level 1-4
    ///
    /// Out-of-range levels are ignored in the same way as channels.
    pub async fn set_power_level(&mut self, level: u8) -> ModemResult<()> {
        let Some(selector) = power_level_char(level) else {
            tracing::warn!(
                "Ignoring power level {} (valid {:?})",
                level,
                POWER_LEVEL_RANGE
            );
            return Ok(());
        };

        tracing::info!("Setting M16 power level to {}", level);
        self.send_doubled(CMD_SET_POWER).await?;
        self.delay.delay(POWER_SELECT_DELAY).await;
        self.transport.send_byte(selector).await?;
        Ok(())
    }

    /// Ask the modem for a status report and wait for the 18-byte answer
    pub async fn request_report(&mut self) -> ModemResult<Report> {
        tracing::debug!("Requesting M16 report");
        self.send_doubled(CMD_REQUEST_REPORT).await?;

        let frame = read_exactly(
            &mut self.transport,
            &mut self.delay,
            Report::LEN,
            self.retry,
        )
        .await?;
        let report = Report::parse(&frame)?;

        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Transmit a packed word, high byte first
    pub async fn send_word(&mut self, word: WireWord) -> ModemResult<()> {
        tracing::debug!("Encoded data: {}", word.to_binary_string());
        self.transport.send_bytes(&word.to_be_bytes()).await?;
        Ok(())
    }

    /// Encode and transmit a message, truncating oversize fields
    pub async fn send_message(&mut self, message: &Message) -> ModemResult<()> {
        let word = self.codec.encode_message(message);
        self.send_word(word).await
    }

    /// Encode and transmit a message, refusing oversize fields
    pub async fn send_message_checked(&mut self, message: &Message) -> ModemResult<()> {
        let word = self.codec.encode_checked(message)?;
        self.send_word(word).await
    }

    /// Wait for the next two-byte message
    ///
    /// Nothing is consumed until both bytes are buffered, so a timeout never
    /// splits a message across calls.
    pub async fn receive_message(&mut self) -> ModemResult<Message> {
        let mut retries = 0;
        while self.transport.bytes_available().await? < 2 {
            retries += 1;
            if retries > self.retry.max_retries {
                return Err(ModemError::Timeout(self.retry.deadline()));
            }
            self.delay.delay(self.retry.poll_interval).await;
        }

        let bytes = read_exactly(&mut self.transport, &mut self.delay, 2, self.retry).await?;
        let message = self.codec.decode_bytes([bytes[0], bytes[1]]);
        tracing::debug!("Received {}", message);
        Ok(message)
    }

    /// Bytes waiting in the receive buffer
    pub async fn rx_buffer_len(&mut self) -> ModemResult<usize> {
        Ok(self.transport.bytes_available().await?)
    }

    /// Take everything currently buffered and clear the receive buffer
    pub async fn drain_rx_buffer(&mut self) -> ModemResult<Vec<u8>> {
        let available = self.transport.bytes_available().await?;
        let mut data = vec![0u8; available];
        let mut total_read = 0;
        while total_read < available {
            let n = self.transport.try_read(&mut data[total_read..]).await?;
            if n == 0 {
                break;
            }
            total_read += n;
        }
        data.truncate(total_read);

        self.transport.clear_input().await?;
        Ok(data)
    }
}
