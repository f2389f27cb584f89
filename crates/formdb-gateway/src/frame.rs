//! gRPC message envelope encoding and decoding.
//!
//! Implements the 5-byte length-prefixed framing:
//! ```text
//! ┌───────────┬───────────┬─────────┐
//! │ Flag      │ Length    │ Payload │
//! │ 1 byte    │ 4 bytes   │ N bytes │
//! │ 0 = plain │ uint32 BE │         │
//! └───────────┴───────────┴─────────┘
//! ```
//!
//! Compressed frames (nonzero flag byte) are not supported and are rejected
//! at decode time. The declared length is validated against a configured
//! maximum before any payload is touched, so a hostile length field cannot
//! drive allocation or out-of-bounds reads.

/// Envelope overhead in bytes (flag + length).
pub const FRAME_OVERHEAD: usize = 5;

/// Default maximum message payload size (4 MB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Frame decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("compressed frames are not supported (flag byte {0:#04x})")]
    CompressedUnsupported(u8),

    #[error("truncated frame: need {needed} bytes, have {have}")]
    Truncated { needed: usize, have: usize },

    #[error("frame payload of {len} bytes exceeds maximum {max}")]
    Oversized { len: usize, max: usize },
}

/// Encode a payload into a single uncompressed frame.
///
/// The buffer is sized from the actual payload; there is no fixed-size
/// staging buffer, so payloads of any length up to the configured maximum
/// frame correctly.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
    buf.push(0);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decode one frame from the front of `buf`.
///
/// Returns the payload and the remaining bytes after the frame. The declared
/// length must fit within `max_len` and within the input.
pub fn decode_frame(buf: &[u8], max_len: usize) -> Result<(&[u8], &[u8]), FrameError> {
    if buf.len() < FRAME_OVERHEAD {
        return Err(FrameError::Truncated {
            needed: FRAME_OVERHEAD,
            have: buf.len(),
        });
    }
    if buf[0] != 0 {
        return Err(FrameError::CompressedUnsupported(buf[0]));
    }
    let len = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
    if len > max_len {
        return Err(FrameError::Oversized { len, max: max_len });
    }
    let total = FRAME_OVERHEAD + len;
    if buf.len() < total {
        return Err(FrameError::Truncated {
            needed: total,
            have: buf.len(),
        });
    }
    Ok((&buf[FRAME_OVERHEAD..total], &buf[total..]))
}
