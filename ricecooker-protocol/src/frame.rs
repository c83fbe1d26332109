//! Status frame decoding for the MCU → driver direction.
//!
//! Frame format (10 bytes):
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): body length, not validated
//! - KEY (1 byte): front-panel key byte, see [`KeyEvent`]
//! - TOP (1 byte): lid temperature in °C
//! - BOTTOM (1 byte): pot temperature in °C
//! - FLAGS (1 byte): bit 0 set while the wifi LED is lit
//! - RESERVED (2 bytes)
//! - CRC (2 bytes, big-endian): CRC16/XMODEM over LENGTH..RESERVED

use heapless::Vec;

use crate::crc::crc16;
use crate::events::KeyEvent;

/// Status frame synchronization byte
pub const STATUS_START: u8 = 0xAA;

/// Complete status frame size
pub const STATUS_FRAME_LEN: usize = 10;

/// LENGTH byte written by [`StatusFrame::encode`]
pub const STATUS_BODY_LEN: u8 = 0x07;

/// Receive buffer capacity of [`StatusDecoder`]
pub const RX_BUFFER_SIZE: usize = 64;

const FLAG_WIFI_LED: u8 = 0x01;

/// Reasons a decode attempt rejected bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Leading bytes are not a start marker
    NoMarker,
    /// CRC does not match the frame body
    ChecksumMismatch,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::NoMarker => f.write_str("no start marker"),
            FrameError::ChecksumMismatch => f.write_str("checksum mismatch"),
        }
    }
}

/// One decoded status report from the panel MCU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFrame {
    /// Lid temperature (°C)
    pub top_temp_c: u8,
    /// Pot temperature (°C)
    pub bottom_temp_c: u8,
    /// Wifi LED state as reported by the MCU
    pub wifi_led_on: bool,
    /// Raw key byte
    pub key_byte: u8,
    /// CRC as received on the wire
    pub checksum: u16,
}

impl StatusFrame {
    /// Build a frame with a checksum matching its encoded body
    pub fn new(top_temp_c: u8, bottom_temp_c: u8, wifi_led_on: bool, key_byte: u8) -> Self {
        let mut frame = Self {
            top_temp_c,
            bottom_temp_c,
            wifi_led_on,
            key_byte,
            checksum: 0,
        };
        frame.checksum = crc16(&frame.body());
        frame
    }

    fn body(&self) -> [u8; 7] {
        let flags = if self.wifi_led_on { FLAG_WIFI_LED } else { 0 };
        [
            STATUS_BODY_LEN,
            self.key_byte,
            self.top_temp_c,
            self.bottom_temp_c,
            flags,
            0,
            0,
        ]
    }

    /// Key pressed on the panel, if the key byte names one
    pub fn key(&self) -> Option<KeyEvent> {
        KeyEvent::from_byte(self.key_byte)
    }

    /// Encode into wire format
    ///
    /// The CRC is recomputed from the fields, so the written checksum always
    /// matches the body.
    pub fn encode(&self) -> [u8; STATUS_FRAME_LEN] {
        let body = self.body();
        let crc = crc16(&body).to_be_bytes();

        let mut out = [0u8; STATUS_FRAME_LEN];
        out[0] = STATUS_START;
        out[1..8].copy_from_slice(&body);
        out[8] = crc[0];
        out[9] = crc[1];
        out
    }
}

/// Result of one decode attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decoded {
    /// A valid frame occupies the first `consumed` bytes
    Frame { frame: StatusFrame, consumed: usize },
    /// More bytes are needed; nothing was consumed
    Incomplete,
    /// The first `consumed` bytes must be dropped before retrying
    Invalid { error: FrameError, consumed: usize },
}

/// Decode at most one status frame from the front of `buf`
///
/// Leading garbage is skipped up to the next start marker. A checksum
/// failure consumes only the marker byte so that a frame starting inside
/// the rejected bytes can still be found.
pub fn decode(buf: &[u8]) -> Decoded {
    let Some(&first) = buf.first() else {
        return Decoded::Incomplete;
    };

    if first != STATUS_START {
        let consumed = buf
            .iter()
            .position(|&b| b == STATUS_START)
            .unwrap_or(buf.len());
        return Decoded::Invalid {
            error: FrameError::NoMarker,
            consumed,
        };
    }

    if buf.len() < STATUS_FRAME_LEN {
        return Decoded::Incomplete;
    }

    let raw = &buf[..STATUS_FRAME_LEN];
    let received = u16::from_be_bytes([raw[8], raw[9]]);
    if crc16(&raw[1..8]) != received {
        return Decoded::Invalid {
            error: FrameError::ChecksumMismatch,
            consumed: 1,
        };
    }

    Decoded::Frame {
        frame: StatusFrame {
            key_byte: raw[2],
            top_temp_c: raw[3],
            bottom_temp_c: raw[4],
            wifi_led_on: raw[5] & FLAG_WIFI_LED != 0,
            checksum: received,
        },
        consumed: STATUS_FRAME_LEN,
    }
}

/// Accumulates UART bytes and yields status frames
///
/// Bytes are kept until a complete frame can be judged, so the sequence of
/// frames produced does not depend on how the input was chunked.
///
/// A corrupted frame is reported as one `ChecksumMismatch`. Markers that
/// turn up inside its remaining bytes while resyncing are reported as
/// `NoMarker`.
#[derive(Debug, Clone, Default)]
pub struct StatusDecoder {
    buffer: Vec<u8, RX_BUFFER_SIZE>,
    /// Bytes of the last rejected frame not yet consumed
    rejected_remaining: usize,
}

impl StatusDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            rejected_remaining: 0,
        }
    }

    /// Append bytes to the receive buffer
    ///
    /// Returns how many bytes were accepted; the rest must be pushed again
    /// after frames have been drained with [`StatusDecoder::next_frame`].
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let accepted = bytes.len().min(self.free());
        // Cannot fail: length checked against free capacity
        let _ = self.buffer.extend_from_slice(&bytes[..accepted]);
        accepted
    }

    /// Free space in the receive buffer
    pub fn free(&self) -> usize {
        RX_BUFFER_SIZE - self.buffer.len()
    }

    /// Number of buffered, undecoded bytes
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop all buffered bytes
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.rejected_remaining = 0;
    }

    /// Decode the next frame from the buffer
    ///
    /// Returns `None` when more bytes are needed, `Some(Err(_))` when bytes
    /// were discarded, and `Some(Ok(frame))` for each valid frame.
    pub fn next_frame(&mut self) -> Option<Result<StatusFrame, FrameError>> {
        match decode(&self.buffer) {
            Decoded::Incomplete => None,
            Decoded::Frame { frame, consumed } => {
                self.consume(consumed);
                self.rejected_remaining = 0;
                Some(Ok(frame))
            }
            Decoded::Invalid {
                error: FrameError::ChecksumMismatch,
                consumed,
            } => {
                // False marker inside the frame rejected last
                let error = if self.rejected_remaining > 0 {
                    FrameError::NoMarker
                } else {
                    self.rejected_remaining = STATUS_FRAME_LEN;
                    FrameError::ChecksumMismatch
                };
                self.consume(consumed);
                Some(Err(error))
            }
            Decoded::Invalid { error, consumed } => {
                self.consume(consumed);
                Some(Err(error))
            }
        }
    }

    fn consume(&mut self, count: usize) {
        let len = self.buffer.len();
        let count = count.min(len);
        self.buffer.copy_within(count.., 0);
        self.buffer.truncate(len - count);
        self.rejected_remaining = self.rejected_remaining.saturating_sub(count);
    }
}
