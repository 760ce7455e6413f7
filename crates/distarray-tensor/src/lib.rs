//! Self-describing binary encoding of dense numeric arrays.
//!
//! A tensor travels as a 32-byte fixed header (dtype code, element
//! count, data byte length, dimension count), followed by per-dimension
//! byte strides and shape, followed by the raw element bytes. Every
//! integer field and every element is big-endian.
//!
//! Encoding accepts only contiguous row-major tensors. Decoding
//! reconstructs whatever shape and strides were recorded — including
//! transposed or otherwise strided views — as a zero-copy view over the
//! input buffer.

pub mod codec;
pub mod dtype;
pub mod error;
pub mod tensor;

pub use codec::{decode_tensor, encode_tensor, FIXED_HEADER_SIZE};
pub use dtype::DType;
pub use error::{Result, TensorError};
pub use tensor::Tensor;
