/// Errors that can occur during frame encoding/parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer is shorter than the fixed 12-byte header.
    #[error("truncated frame: {len} bytes, header needs 12")]
    TruncatedHeader { len: usize },

    /// The buffer is shorter than the length declared in the header.
    #[error("truncated frame: header declares {declared} bytes, only {available} available")]
    TruncatedPayload { declared: usize, available: usize },

    /// The header declares a total length smaller than the header itself.
    #[error("invalid total_len {declared}, header alone is 12 bytes")]
    InvalidTotalLen { declared: usize },

    /// The payload would push the total length past what fits in u32.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The header carries a message type outside the defined set.
    #[error("unknown message type {0:#04x}")]
    UnknownMsgType(u8),

    /// The header carries an opcode outside the defined set.
    #[error("unknown opcode {0:#06x}")]
    UnknownOpCode(u16),

    /// The header carries flag bits outside the defined mask.
    #[error("undefined target flag bits {0:#04x}")]
    InvalidFlags(u8),
}

impl FrameError {
    /// True for errors a streaming caller can recover from by waiting
    /// for more bytes; false for corrupt-message errors.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            FrameError::TruncatedHeader { .. } | FrameError::TruncatedPayload { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
