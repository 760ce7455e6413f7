//! Header field types: message kind, operation code, target flags.
//!
//! All three are closed sets. Values outside the defined codes are
//! rejected at parse time rather than coerced.

use crate::error::{FrameError, Result};

/// Message kind carried in the header's msg_type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MsgType {
    Request = 0x01,
    Response = 0x02,
    Error = 0x03,
}

impl MsgType {
    pub fn from_wire(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(MsgType::Request),
            0x02 => Ok(MsgType::Response),
            0x03 => Ok(MsgType::Error),
            other => Err(FrameError::UnknownMsgType(other)),
        }
    }

    pub fn as_wire(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MsgType::Request => "REQUEST",
            MsgType::Response => "RESPONSE",
            MsgType::Error => "ERROR",
        }
    }
}

/// Requested operation, carried in the header's 2-byte opcode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum OpCode {
    MatMul = 0x0001,
}

impl OpCode {
    pub fn from_wire(value: u16) -> Result<Self> {
        match value {
            0x0001 => Ok(OpCode::MatMul),
            other => Err(FrameError::UnknownOpCode(other)),
        }
    }

    pub fn as_wire(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            OpCode::MatMul => "MAT_MUL",
        }
    }
}

/// Target-capability bitmask carried in the header's flags byte.
///
/// Zero is legal and means no target preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFlags(u8);

impl TargetFlags {
    /// Execute on a CPU backend.
    pub const CPU: u8 = 1 << 0;
    /// Execute on a GPU backend.
    pub const GPU: u8 = 1 << 1;
    /// Execute on an FPGA backend.
    pub const FPGA: u8 = 1 << 2;

    const VALID_MASK: u8 = 0b0000_0111;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_cpu(mut self) -> Self {
        self.0 |= Self::CPU;
        self
    }

    pub fn with_gpu(mut self) -> Self {
        self.0 |= Self::GPU;
        self
    }

    pub fn with_fpga(mut self) -> Self {
        self.0 |= Self::FPGA;
        self
    }

    pub fn has_cpu(&self) -> bool {
        self.0 & Self::CPU != 0
    }

    pub fn has_gpu(&self) -> bool {
        self.0 & Self::GPU != 0
    }

    pub fn has_fpga(&self) -> bool {
        self.0 & Self::FPGA != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits & !Self::VALID_MASK != 0 {
            return Err(FrameError::InvalidFlags(bits));
        }
        Ok(Self(bits))
    }
}
