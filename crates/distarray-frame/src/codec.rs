use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::header::{MsgType, OpCode, TargetFlags};

/// Frame header: total_len (4) + msg_type (1) + flags (1) + opcode (2) + seq_id (4) = 12 bytes.
pub const HEADER_SIZE: usize = 12;

/// Largest payload a frame can declare: total_len is u32.
pub const MAX_PAYLOAD: usize = u32::MAX as usize - HEADER_SIZE;

/// A parsed message frame.
///
/// `payload` is a zero-copy slice of the buffer handed to [`parse_frame`];
/// it keeps that buffer alive for as long as the frame is held.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Requested operation.
    pub opcode: OpCode,
    /// Message kind.
    pub msg_type: MsgType,
    /// Target-capability bits.
    pub flags: TargetFlags,
    /// Caller-assigned correlation id.
    pub seq_id: u32,
    /// Operation-specific body, typically an encoded tensor.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(
        opcode: OpCode,
        msg_type: MsgType,
        flags: TargetFlags,
        seq_id: u32,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            opcode,
            msg_type,
            flags,
            seq_id,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode this frame into the wire format.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_frame(
            self.opcode,
            self.msg_type,
            self.flags,
            self.seq_id as u64,
            &self.payload,
            dst,
        )
    }
}

/// Encode a frame into the wire format.
///
/// Wire format (all fields big-endian):
/// ```text
/// ┌───────────┬──────────┬─────────┬─────────┬──────────┬──────────────────┐
/// │ total_len │ msg_type │ flags   │ opcode  │ seq_id   │ payload          │
/// │ (4B)      │ (1B)     │ (1B)    │ (2B)    │ (4B)     │ total_len-12 B   │
/// └───────────┴──────────┴─────────┴─────────┴──────────┴──────────────────┘
/// ```
///
/// `seq_id` is truncated to its low 32 bits; callers that count past
/// 2^32 wrap rather than fail.
pub fn encode_frame(
    opcode: OpCode,
    msg_type: MsgType,
    flags: TargetFlags,
    seq_id: u64,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    let total_len = (HEADER_SIZE + payload.len()) as u32;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32(total_len);
    dst.put_u8(msg_type.as_wire());
    dst.put_u8(flags.bits());
    dst.put_u16(opcode.as_wire());
    dst.put_u32((seq_id & 0xFFFF_FFFF) as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Parse one frame from the front of a buffer.
///
/// The buffer may be longer than the frame; only the first `total_len`
/// bytes are interpreted. The returned payload aliases `buf` with no
/// copy.
///
/// Truncation errors ([`FrameError::is_truncation`]) mean the caller
/// can retry once more bytes arrive; every other error means the
/// message is corrupt.
pub fn parse_frame(buf: &Bytes) -> Result<Frame> {
    if buf.len() < HEADER_SIZE {
        return Err(FrameError::TruncatedHeader { len: buf.len() });
    }

    let total_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if total_len < HEADER_SIZE {
        return Err(FrameError::InvalidTotalLen {
            declared: total_len,
        });
    }
    if buf.len() < total_len {
        return Err(FrameError::TruncatedPayload {
            declared: total_len,
            available: buf.len(),
        });
    }

    let msg_type = MsgType::from_wire(buf[4])?;
    let flags = TargetFlags::from_bits(buf[5])?;
    let opcode = OpCode::from_wire(u16::from_be_bytes([buf[6], buf[7]]))?;
    let seq_id = u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);

    let payload = buf.slice(HEADER_SIZE..total_len);

    Ok(Frame {
        opcode,
        msg_type,
        flags,
        seq_id,
        payload,
    })
}
