//! Element data types.
//!
//! The wire supports exactly two dtypes. Anything else is rejected at
//! the codec boundary, never reinterpreted.

use std::fmt;

use crate::error::{Result, TensorError};

/// Element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 64-bit IEEE 754 float, wire code 0.
    F64,
    /// 64-bit signed integer, wire code 1.
    I64,
}

impl DType {
    /// Wire code carried in the encoded header.
    pub fn code(self) -> i64 {
        match self {
            DType::F64 => 0,
            DType::I64 => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(DType::F64),
            1 => Ok(DType::I64),
            other => Err(TensorError::UnknownDtype(other)),
        }
    }

    /// Size of a single element in bytes.
    pub fn element_size(self) -> usize {
        8
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F64 => write!(f, "float64"),
            DType::I64 => write!(f, "int64"),
        }
    }
}
