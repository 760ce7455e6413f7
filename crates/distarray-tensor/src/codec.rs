use bytes::{BufMut, Bytes, BytesMut};

use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::tensor::Tensor;

/// Fixed header: dtype_code (8) + size (8) + nbytes (8) + ndim (8) = 32 bytes.
pub const FIXED_HEADER_SIZE: usize = 32;

/// Encode a tensor into the self-describing wire format.
///
/// Wire layout (every field an 8-byte big-endian signed integer, data
/// big-endian row-major):
/// ```text
/// ┌────────────┬──────┬────────┬──────┬───────────────┬─────────────┬────────┐
/// │ dtype_code │ size │ nbytes │ ndim │ strides[ndim] │ shape[ndim] │ data   │
/// └────────────┴──────┴────────┴──────┴───────────────┴─────────────┴────────┘
/// ```
///
/// Only contiguous row-major tensors are accepted.
pub fn encode_tensor(tensor: &Tensor) -> Result<Bytes> {
    if !tensor.is_contiguous() {
        return Err(TensorError::NotContiguous);
    }

    let ndim = tensor.ndim();
    let mut buf = BytesMut::with_capacity(FIXED_HEADER_SIZE + 16 * ndim + tensor.nbytes());

    buf.put_i64(tensor.dtype().code());
    buf.put_i64(tensor.size() as i64);
    buf.put_i64(tensor.nbytes() as i64);
    buf.put_i64(ndim as i64);
    for &stride in tensor.strides() {
        buf.put_i64(stride);
    }
    for &dim in tensor.shape() {
        buf.put_i64(dim);
    }
    buf.put_slice(tensor.data());

    Ok(buf.freeze())
}

/// Decode a tensor from a buffer.
///
/// The returned tensor's data is a zero-copy slice of `buf`. Shape and
/// strides are reconstructed exactly as recorded — a transposed or
/// otherwise strided view decodes as that view, with no contiguity
/// check. Strides pointing outside the data section are not rejected
/// here; element access on such a tensor fails instead of reading out
/// of bounds.
///
/// The fixed header must be internally consistent: `size` must equal
/// the product of the shape and `nbytes` must equal `size` times the
/// element width. Mismatches are schema errors, not truncations.
///
/// Each truncation condition (header, strides, shape, data) fails with
/// its own error variant.
pub fn decode_tensor(buf: &Bytes) -> Result<Tensor> {
    if buf.len() < FIXED_HEADER_SIZE {
        return Err(TensorError::TruncatedHeader { len: buf.len() });
    }

    let dtype_code = read_i64(buf, 0);
    let size = read_i64(buf, 8);
    let nbytes = read_i64(buf, 16);
    let ndim = read_i64(buf, 24);

    let dtype = DType::from_code(dtype_code)?;
    for (field, value) in [("size", size), ("nbytes", nbytes), ("ndim", ndim)] {
        if value < 0 {
            return Err(TensorError::InvalidField { field, value });
        }
    }
    let ndim = ndim as usize;

    // Saturating so an absurd ndim fails the length check instead of
    // wrapping the offset arithmetic.
    let strides_end = ndim.saturating_mul(8).saturating_add(FIXED_HEADER_SIZE);
    if buf.len() < strides_end {
        return Err(TensorError::TruncatedStrides {
            needed: strides_end,
            available: buf.len(),
        });
    }
    let strides: Vec<i64> = (0..ndim)
        .map(|d| read_i64(buf, FIXED_HEADER_SIZE + 8 * d))
        .collect();

    let shape_end = strides_end + 8 * ndim;
    if buf.len() < shape_end {
        return Err(TensorError::TruncatedShape {
            needed: shape_end,
            available: buf.len(),
        });
    }
    let shape: Vec<i64> = (0..ndim)
        .map(|d| read_i64(buf, strides_end + 8 * d))
        .collect();
    for &dim in &shape {
        if dim < 0 {
            return Err(TensorError::InvalidField {
                field: "shape",
                value: dim,
            });
        }
    }

    // Header consistency: size == product(shape), nbytes == size * width.
    let product = shape
        .iter()
        .try_fold(1i64, |acc, &dim| acc.checked_mul(dim));
    if product != Some(size) {
        return Err(TensorError::InvalidField {
            field: "size",
            value: size,
        });
    }
    if size.checked_mul(dtype.element_size() as i64) != Some(nbytes) {
        return Err(TensorError::InvalidField {
            field: "nbytes",
            value: nbytes,
        });
    }
    let nbytes = nbytes as usize;

    let data_end = shape_end.saturating_add(nbytes);
    if buf.len() < data_end {
        return Err(TensorError::TruncatedData {
            needed: data_end,
            available: buf.len(),
        });
    }
    let data = buf.slice(shape_end..data_end);

    Ok(Tensor::from_raw_parts(dtype, shape, strides, data))
}

fn read_i64(buf: &Bytes, offset: usize) -> i64 {
    i64::from_be_bytes(
        buf[offset..offset + 8]
            .try_into()
            .expect("offset is bounds checked"),
    )
}
