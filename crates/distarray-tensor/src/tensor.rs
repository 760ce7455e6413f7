//! In-memory tensor value.
//!
//! Element bytes are held in wire (big-endian) order at all times, so
//! encoding appends the buffer verbatim and decoding is a zero-copy
//! slice. Accessors convert on read.

use bytes::{BufMut, Bytes, BytesMut};

use crate::dtype::DType;
use crate::error::{Result, TensorError};

/// A dense numeric array: dtype, shape, byte strides, raw element bytes.
///
/// Tensors built by the constructors are always contiguous row-major.
/// Tensors produced by [`crate::decode_tensor`] carry whatever strides
/// were recorded on the wire and may describe transposed or otherwise
/// strided views; all element access is bounds checked against the
/// data buffer.
#[derive(Debug, Clone)]
pub struct Tensor {
    dtype: DType,
    shape: Vec<i64>,
    strides: Vec<i64>,
    data: Bytes,
}

impl Tensor {
    /// Build a contiguous row-major float64 tensor.
    pub fn from_f64(shape: impl Into<Vec<i64>>, values: &[f64]) -> Result<Self> {
        let shape = shape.into();
        let size = checked_size(&shape)?;
        if size != values.len() {
            return Err(TensorError::ShapeMismatch {
                expected: size,
                actual: values.len(),
            });
        }
        let mut data = BytesMut::with_capacity(values.len() * 8);
        for v in values {
            data.put_f64(*v);
        }
        Ok(Self {
            strides: packed_strides(&shape, DType::F64.element_size()),
            dtype: DType::F64,
            shape,
            data: data.freeze(),
        })
    }

    /// Build a contiguous row-major int64 tensor.
    pub fn from_i64(shape: impl Into<Vec<i64>>, values: &[i64]) -> Result<Self> {
        let shape = shape.into();
        let size = checked_size(&shape)?;
        if size != values.len() {
            return Err(TensorError::ShapeMismatch {
                expected: size,
                actual: values.len(),
            });
        }
        let mut data = BytesMut::with_capacity(values.len() * 8);
        for v in values {
            data.put_i64(*v);
        }
        Ok(Self {
            strides: packed_strides(&shape, DType::I64.element_size()),
            dtype: DType::I64,
            shape,
            data: data.freeze(),
        })
    }

    /// Assemble a tensor from already-validated parts (decode path).
    pub(crate) fn from_raw_parts(
        dtype: DType,
        shape: Vec<i64>,
        strides: Vec<i64>,
        data: Bytes,
    ) -> Self {
        Self {
            dtype,
            shape,
            strides,
            data,
        }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Byte strides per dimension, exactly as carried on the wire.
    pub fn strides(&self) -> &[i64] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total element count (product of the shape).
    pub fn size(&self) -> usize {
        self.shape.iter().product::<i64>() as usize
    }

    /// Total raw-data byte length.
    pub fn nbytes(&self) -> usize {
        self.data.len()
    }

    /// Raw element bytes, big-endian, in memory order.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// True when the strides describe a tightly packed row-major layout.
    pub fn is_contiguous(&self) -> bool {
        self.strides == packed_strides(&self.shape, self.dtype.element_size())
    }

    /// Read one float64 element by multi-index.
    ///
    /// Returns `None` for the wrong dtype, a wrong-arity or
    /// out-of-range index, or strides that land outside the data.
    pub fn get_f64(&self, index: &[usize]) -> Option<f64> {
        if self.dtype != DType::F64 {
            return None;
        }
        self.element_offset(index)
            .map(|off| f64::from_be_bytes(self.read_raw(off)))
    }

    /// Read one int64 element by multi-index.
    pub fn get_i64(&self, index: &[usize]) -> Option<i64> {
        if self.dtype != DType::I64 {
            return None;
        }
        self.element_offset(index)
            .map(|off| i64::from_be_bytes(self.read_raw(off)))
    }

    /// Extract all float64 elements in logical row-major order.
    ///
    /// Follows the strides, so a transposed view yields its elements in
    /// the view's own row-major order.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        if self.dtype != DType::F64 {
            return Err(TensorError::DtypeMismatch {
                requested: DType::F64,
                actual: self.dtype,
            });
        }
        self.walk(|raw| f64::from_be_bytes(raw))
    }

    /// Extract all int64 elements in logical row-major order.
    pub fn to_i64_vec(&self) -> Result<Vec<i64>> {
        if self.dtype != DType::I64 {
            return Err(TensorError::DtypeMismatch {
                requested: DType::I64,
                actual: self.dtype,
            });
        }
        self.walk(|raw| i64::from_be_bytes(raw))
    }

    /// Byte offset of an element, or `None` if the index or the
    /// recorded strides fall outside the data buffer.
    fn element_offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset: i64 = 0;
        for (d, &idx) in index.iter().enumerate() {
            if (idx as i64) >= self.shape[d] {
                return None;
            }
            offset += idx as i64 * self.strides[d];
        }
        if offset < 0 || offset as usize + 8 > self.data.len() {
            return None;
        }
        Some(offset as usize)
    }

    fn read_raw(&self, offset: usize) -> [u8; 8] {
        self.data[offset..offset + 8]
            .try_into()
            .expect("offset is bounds checked")
    }

    /// Odometer walk over all indices, last dimension fastest.
    fn walk<T>(&self, convert: impl Fn([u8; 8]) -> T) -> Result<Vec<T>> {
        if self.shape.iter().any(|&d| d == 0) {
            return Ok(Vec::new());
        }
        let size = self.size();
        let ndim = self.shape.len();
        let mut index = vec![0usize; ndim];
        let mut out = Vec::with_capacity(size);
        for _ in 0..size {
            let mut offset: i64 = 0;
            for d in 0..ndim {
                offset += index[d] as i64 * self.strides[d];
            }
            if offset < 0 || offset as usize + 8 > self.data.len() {
                return Err(TensorError::StrideOutOfBounds {
                    offset,
                    len: self.data.len(),
                });
            }
            out.push(convert(self.read_raw(offset as usize)));
            for d in (0..ndim).rev() {
                index[d] += 1;
                if (index[d] as i64) < self.shape[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        Ok(out)
    }
}

/// Tightly packed row-major byte strides for a shape.
pub(crate) fn packed_strides(shape: &[i64], element_size: usize) -> Vec<i64> {
    let mut strides = vec![0i64; shape.len()];
    let mut stride = element_size as i64;
    for d in (0..shape.len()).rev() {
        strides[d] = stride;
        stride *= shape[d];
    }
    strides
}

/// Element count for a shape, rejecting negative dimensions.
pub(crate) fn checked_size(shape: &[i64]) -> Result<usize> {
    let mut size: i64 = 1;
    for &dim in shape {
        if dim < 0 {
            return Err(TensorError::InvalidField {
                field: "shape",
                value: dim,
            });
        }
        size *= dim;
    }
    Ok(size as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_i64_builds_row_major() {
        let t = Tensor::from_i64(vec![2, 4], &[1, 2, 3, 4, 1, 1, 1, 1]).unwrap();
        assert_eq!(t.dtype(), DType::I64);
        assert_eq!(t.shape(), &[2, 4]);
        assert_eq!(t.strides(), &[32, 8]);
        assert_eq!(t.size(), 8);
        assert_eq!(t.nbytes(), 64);
        assert!(t.is_contiguous());
    }

    #[test]
    fn from_f64_scalar() {
        let t = Tensor::from_f64(Vec::new(), &[2.5]).unwrap();
        assert_eq!(t.ndim(), 0);
        assert_eq!(t.size(), 1);
        assert_eq!(t.nbytes(), 8);
        assert_eq!(t.get_f64(&[]), Some(2.5));
    }

    #[test]
    fn shape_mismatch_rejected() {
        let err = Tensor::from_f64(vec![2, 2], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            TensorError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn negative_dimension_rejected() {
        let err = Tensor::from_i64(vec![2, -1], &[]).unwrap_err();
        assert!(matches!(
            err,
            TensorError::InvalidField {
                field: "shape",
                value: -1
            }
        ));
    }

    #[test]
    fn indexed_access() {
        let t = Tensor::from_i64(vec![2, 3], &[10, 11, 12, 20, 21, 22]).unwrap();
        assert_eq!(t.get_i64(&[0, 0]), Some(10));
        assert_eq!(t.get_i64(&[1, 2]), Some(22));
        assert_eq!(t.get_i64(&[2, 0]), None); // out of range
        assert_eq!(t.get_i64(&[0]), None); // wrong arity
        assert_eq!(t.get_f64(&[0, 0]), None); // wrong dtype
    }

    #[test]
    fn to_vec_roundtrips_values() {
        let values = [1.5, -2.0, 0.0, f64::MAX, f64::MIN_POSITIVE, -0.0];
        let t = Tensor::from_f64(vec![2, 3], &values).unwrap();
        assert_eq!(t.to_f64_vec().unwrap(), values);
    }

    #[test]
    fn to_vec_wrong_dtype() {
        let t = Tensor::from_i64(vec![2], &[1, 2]).unwrap();
        let err = t.to_f64_vec().unwrap_err();
        assert!(matches!(err, TensorError::DtypeMismatch { .. }));
    }

    #[test]
    fn transposed_view_walks_in_view_order() {
        // Row-major [[1,2,3],[4,5,6]] with swapped shape/strides reads
        // as its transpose [[1,4],[2,5],[3,6]].
        let base = Tensor::from_i64(vec![2, 3], &[1, 2, 3, 4, 5, 6]).unwrap();
        let view = Tensor::from_raw_parts(
            DType::I64,
            vec![3, 2],
            vec![8, 24],
            base.data().clone(),
        );
        assert!(!view.is_contiguous());
        assert_eq!(view.to_i64_vec().unwrap(), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(view.get_i64(&[2, 1]), Some(6));
    }

    #[test]
    fn hostile_strides_fail_closed() {
        let t = Tensor::from_raw_parts(
            DType::I64,
            vec![4],
            vec![1024],
            Bytes::from(vec![0u8; 16]),
        );
        assert_eq!(t.get_i64(&[2]), None);
        let err = t.to_i64_vec().unwrap_err();
        assert!(matches!(err, TensorError::StrideOutOfBounds { .. }));
    }

    #[test]
    fn zero_length_dimension() {
        let t = Tensor::from_f64(vec![0, 3], &[]).unwrap();
        assert_eq!(t.size(), 0);
        assert_eq!(t.to_f64_vec().unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn packed_strides_match_numpy_convention() {
        assert_eq!(packed_strides(&[2, 4], 8), vec![32, 8]);
        assert_eq!(packed_strides(&[3], 8), vec![8]);
        assert_eq!(packed_strides(&[], 8), Vec::<i64>::new());
        assert_eq!(packed_strides(&[2, 3, 4], 8), vec![96, 32, 8]);
    }
}
