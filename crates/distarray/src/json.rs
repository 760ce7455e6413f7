//! JSON ⇄ tensor conversion for the CLI surface.
//!
//! Nested JSON arrays map to tensor dimensions; the nesting must be
//! rectangular. A bare number is a 0-dimensional tensor.

use distarray_tensor::{DType, Tensor};
use serde_json::Value;

use crate::exit::{tensor_error, CliError, CliResult, USAGE};

/// Build a contiguous tensor from nested JSON arrays.
pub fn tensor_from_json(value: &Value, dtype: DType) -> CliResult<Tensor> {
    let shape = probe_shape(value);
    match dtype {
        DType::F64 => {
            let mut values = Vec::new();
            flatten(value, &shape, 0, &mut values, &|v| v.as_f64())?;
            Tensor::from_f64(shape, &values).map_err(|err| tensor_error("invalid tensor", err))
        }
        DType::I64 => {
            let mut values = Vec::new();
            flatten(value, &shape, 0, &mut values, &|v| v.as_i64())?;
            Tensor::from_i64(shape, &values).map_err(|err| tensor_error("invalid tensor", err))
        }
    }
}

/// Render a tensor's values as nested JSON arrays in logical row-major
/// order (follows strides, so strided views render as viewed).
pub fn tensor_to_json(tensor: &Tensor) -> CliResult<Value> {
    let flat: Vec<Value> = match tensor.dtype() {
        DType::F64 => tensor
            .to_f64_vec()
            .map_err(|err| tensor_error("unreadable tensor", err))?
            .into_iter()
            .map(|v| match serde_json::Number::from_f64(v) {
                Some(n) => Value::Number(n),
                None => Value::Null, // NaN / infinity have no JSON form
            })
            .collect(),
        DType::I64 => tensor
            .to_i64_vec()
            .map_err(|err| tensor_error("unreadable tensor", err))?
            .into_iter()
            .map(|v| Value::Number(v.into()))
            .collect(),
    };
    Ok(nest(&flat, tensor.shape()))
}

/// Dimensions implied by the nesting of the first elements.
fn probe_shape(value: &Value) -> Vec<i64> {
    let mut shape = Vec::new();
    let mut probe = value;
    while let Value::Array(items) = probe {
        shape.push(items.len() as i64);
        match items.first() {
            Some(first) => probe = first,
            None => break,
        }
    }
    shape
}

fn flatten<T>(
    value: &Value,
    shape: &[i64],
    depth: usize,
    out: &mut Vec<T>,
    extract: &dyn Fn(&Value) -> Option<T>,
) -> CliResult<()> {
    if depth == shape.len() {
        let item = extract(value)
            .ok_or_else(|| CliError::new(USAGE, format!("not a valid element: {value}")))?;
        out.push(item);
        return Ok(());
    }
    let Value::Array(items) = value else {
        return Err(CliError::new(
            USAGE,
            format!("ragged nesting: expected an array at depth {depth}"),
        ));
    };
    if items.len() as i64 != shape[depth] {
        return Err(CliError::new(
            USAGE,
            format!(
                "ragged nesting: expected {} elements at depth {depth}, got {}",
                shape[depth],
                items.len()
            ),
        ));
    }
    for item in items {
        flatten(item, shape, depth + 1, out, extract)?;
    }
    Ok(())
}

fn nest(values: &[Value], shape: &[i64]) -> Value {
    match shape.split_first() {
        None => values[0].clone(),
        Some((&dim, rest)) => {
            if dim == 0 {
                return Value::Array(Vec::new());
            }
            let chunk = values.len() / dim as usize;
            if chunk == 0 {
                // A zero dimension deeper in the shape; recurse on
                // empty slices until it terminates the nesting.
                return Value::Array((0..dim).map(|_| nest(&[], rest)).collect());
            }
            Value::Array(values.chunks(chunk).map(|c| nest(c, rest)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_arrays_to_tensor() {
        let value = json!([[1, 2, 3, 4], [1, 1, 1, 1]]);
        let tensor = tensor_from_json(&value, DType::I64).unwrap();
        assert_eq!(tensor.shape(), &[2, 4]);
        assert_eq!(
            tensor.to_i64_vec().unwrap(),
            vec![1, 2, 3, 4, 1, 1, 1, 1]
        );
    }

    #[test]
    fn bare_number_is_scalar() {
        let tensor = tensor_from_json(&json!(2.5), DType::F64).unwrap();
        assert_eq!(tensor.ndim(), 0);
        assert_eq!(tensor.get_f64(&[]), Some(2.5));
    }

    #[test]
    fn integers_promote_to_f64() {
        let tensor = tensor_from_json(&json!([1, 2]), DType::F64).unwrap();
        assert_eq!(tensor.to_f64_vec().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn floats_rejected_for_i64() {
        let err = tensor_from_json(&json!([1.5]), DType::I64).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn ragged_nesting_rejected() {
        let err = tensor_from_json(&json!([[1, 2], [3]]), DType::I64).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("ragged"));
    }

    #[test]
    fn non_numeric_rejected() {
        let err = tensor_from_json(&json!(["a", "b"]), DType::I64).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn json_roundtrip() {
        let value = json!([[1, 2], [3, 4], [5, 6]]);
        let tensor = tensor_from_json(&value, DType::I64).unwrap();
        assert_eq!(tensor_to_json(&tensor).unwrap(), value);
    }

    #[test]
    fn empty_array_roundtrip() {
        let value = json!([]);
        let tensor = tensor_from_json(&value, DType::F64).unwrap();
        assert_eq!(tensor.shape(), &[0]);
        assert_eq!(tensor_to_json(&tensor).unwrap(), value);
    }
}
