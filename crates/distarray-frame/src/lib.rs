//! Fixed-header message framing for the distarray compute protocol.
//!
//! Every message carries a 12-byte big-endian header:
//! - A 4-byte total length (header + payload)
//! - A 1-byte message type (request / response / error)
//! - A 1-byte target-capability bitmask (CPU / GPU / FPGA)
//! - A 2-byte operation code
//! - A 4-byte caller-assigned sequence id
//!
//! The payload is opaque to this crate — typically an encoded tensor
//! from `distarray-tensor`, composed by the caller.

pub mod codec;
pub mod error;
pub mod header;

pub use codec::{encode_frame, parse_frame, Frame, HEADER_SIZE, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use header::{MsgType, OpCode, TargetFlags};
