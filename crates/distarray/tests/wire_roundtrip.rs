//! End-to-end composition of the two codecs: tensor → frame → wire →
//! frame → tensor, the way a transport caller assembles messages.

use bytes::{Bytes, BytesMut};
use distarray_frame::{encode_frame, parse_frame, FrameError, MsgType, OpCode, TargetFlags};
use distarray_tensor::{decode_tensor, encode_tensor, DType, Tensor};

#[test]
fn request_roundtrip_through_frame() {
    let tensor = Tensor::from_i64(vec![2, 4], &[1, 2, 3, 4, 1, 1, 1, 1]).unwrap();
    let payload = encode_tensor(&tensor).unwrap();

    let mut wire = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Request,
        TargetFlags::new().with_cpu().with_gpu(),
        123_456_789,
        &payload,
        &mut wire,
    )
    .unwrap();
    let wire = wire.freeze();

    let frame = parse_frame(&wire).unwrap();
    assert_eq!(frame.opcode, OpCode::MatMul);
    assert_eq!(frame.msg_type, MsgType::Request);
    assert_eq!(frame.seq_id, 123_456_789);
    assert!(frame.flags.has_cpu() && frame.flags.has_gpu() && !frame.flags.has_fpga());

    let decoded = decode_tensor(&frame.payload).unwrap();
    assert_eq!(decoded.dtype(), DType::I64);
    assert_eq!(decoded.shape(), &[2, 4]);
    assert_eq!(decoded.strides(), tensor.strides());
    assert_eq!(decoded.to_i64_vec().unwrap(), vec![1, 2, 3, 4, 1, 1, 1, 1]);
}

#[test]
fn response_payload_aliases_the_wire_buffer() {
    let tensor = Tensor::from_f64(vec![3], &[1.0, 2.0, 3.0]).unwrap();
    let payload = encode_tensor(&tensor).unwrap();

    let mut wire = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Response,
        TargetFlags::new().with_gpu(),
        1,
        &payload,
        &mut wire,
    )
    .unwrap();
    let wire = wire.freeze();

    let frame = parse_frame(&wire).unwrap();
    let decoded = decode_tensor(&frame.payload).unwrap();

    // Frame payload and tensor data both alias the single wire buffer.
    assert_eq!(frame.payload.as_ptr(), wire[12..].as_ptr());
    let data_start = 12 + 32 + 16;
    assert_eq!(decoded.data().as_ptr(), wire[data_start..].as_ptr());
    assert_eq!(decoded.to_f64_vec().unwrap(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn error_frames_carry_opaque_status_payloads() {
    let status = b"backend unavailable";
    let mut wire = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Error,
        TargetFlags::new(),
        42,
        status,
        &mut wire,
    )
    .unwrap();

    let frame = parse_frame(&wire.freeze()).unwrap();
    assert_eq!(frame.msg_type, MsgType::Error);
    assert_eq!(frame.payload.as_ref(), status);
}

#[test]
fn truncation_is_distinguishable_at_both_layers() {
    let tensor = Tensor::from_i64(vec![2], &[1, 2]).unwrap();
    let payload = encode_tensor(&tensor).unwrap();

    let mut wire = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Request,
        TargetFlags::new().with_cpu(),
        5,
        &payload,
        &mut wire,
    )
    .unwrap();
    let wire = wire.freeze();

    // Cut inside the frame: the frame layer reports truncation.
    let cut = wire.slice(..wire.len() - 1);
    let err = parse_frame(&cut).unwrap_err();
    assert!(err.is_truncation());

    // Intact frame, payload cut before framing: the tensor layer reports it.
    let short_payload: Bytes = payload.slice(..payload.len() - 1);
    let mut wire2 = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Request,
        TargetFlags::new().with_cpu(),
        5,
        &short_payload,
        &mut wire2,
    )
    .unwrap();
    let frame = parse_frame(&wire2.freeze()).unwrap();
    let err = decode_tensor(&frame.payload).unwrap_err();
    assert!(err.is_truncation());
}

#[test]
fn seq_id_wraps_through_the_full_path() {
    let mut wire = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Request,
        TargetFlags::new(),
        (1u64 << 32) + 1,
        b"",
        &mut wire,
    )
    .unwrap();
    let frame = parse_frame(&wire.freeze()).unwrap();
    assert_eq!(frame.seq_id, 1);
}

#[test]
fn corrupt_opcode_is_not_a_truncation() {
    let mut wire = BytesMut::new();
    encode_frame(
        OpCode::MatMul,
        MsgType::Request,
        TargetFlags::new(),
        0,
        b"",
        &mut wire,
    )
    .unwrap();
    wire[6] = 0xFF;
    wire[7] = 0xFF;

    let err = parse_frame(&wire.freeze()).unwrap_err();
    assert!(matches!(err, FrameError::UnknownOpCode(0xFFFF)));
    assert!(!err.is_truncation());
}
