use crate::dtype::DType;

/// Errors that can occur while building, encoding, or decoding tensors.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The buffer is shorter than the fixed 32-byte header.
    #[error("truncated buffer: {len} bytes, header needs 32")]
    TruncatedHeader { len: usize },

    /// The buffer ends inside the strides section.
    #[error("truncated buffer: strides need {needed} bytes, only {available} available")]
    TruncatedStrides { needed: usize, available: usize },

    /// The buffer ends inside the shape section.
    #[error("truncated buffer: shape needs {needed} bytes, only {available} available")]
    TruncatedShape { needed: usize, available: usize },

    /// The buffer ends inside the raw data section.
    #[error("truncated buffer: data needs {needed} bytes, only {available} available")]
    TruncatedData { needed: usize, available: usize },

    /// The header carries a dtype code outside the defined set.
    #[error("unknown dtype code {0}")]
    UnknownDtype(i64),

    /// A signed header field carries a value that makes no sense.
    #[error("invalid {field} in header: {value}")]
    InvalidField { field: &'static str, value: i64 },

    /// Encoding requires a densely packed row-major tensor.
    #[error("tensor is not contiguous (row-major packed)")]
    NotContiguous,

    /// Element count does not match the product of the shape.
    #[error("shape expects {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Typed access with the wrong element type.
    #[error("dtype mismatch: tensor is {actual}, requested {requested}")]
    DtypeMismatch { requested: DType, actual: DType },

    /// The recorded strides point outside the raw data.
    #[error("stride walk leaves the data buffer (offset {offset}, data length {len})")]
    StrideOutOfBounds { offset: i64, len: usize },
}

impl TensorError {
    /// True for errors a streaming caller can recover from by waiting
    /// for more bytes; false for corrupt-message errors.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            TensorError::TruncatedHeader { .. }
                | TensorError::TruncatedStrides { .. }
                | TensorError::TruncatedShape { .. }
                | TensorError::TruncatedData { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TensorError>;
