use std::fs;

use bytes::BytesMut;
use distarray_frame::{encode_frame, MsgType, OpCode, TargetFlags};
use distarray_tensor::{encode_tensor, DType};
use tracing::debug;

use crate::cmd::{DtypeArg, MsgTypeArg, OpArg, PackArgs, TargetArg};
use crate::exit::{frame_error, io_error, tensor_error, CliError, CliResult, SUCCESS, USAGE};
use crate::json::tensor_from_json;
use crate::output::write_wire_bytes;

pub fn run(args: PackArgs) -> CliResult<i32> {
    let value = resolve_json(&args)?;
    let tensor = tensor_from_json(&value, dtype(args.dtype))?;
    debug!(
        dtype = %tensor.dtype(),
        shape = ?tensor.shape(),
        nbytes = tensor.nbytes(),
        "tensor built"
    );

    let payload = encode_tensor(&tensor).map_err(|err| tensor_error("encode failed", err))?;

    let mut wire = BytesMut::new();
    encode_frame(
        opcode(args.op),
        msg_type(args.msg_type),
        targets(&args.targets),
        args.seq,
        &payload,
        &mut wire,
    )
    .map_err(|err| frame_error("frame failed", err))?;
    debug!(total_len = wire.len(), "frame packed");

    match &args.out {
        Some(path) => fs::write(path, &wire)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?,
        None => write_wire_bytes(&wire).map_err(|err| io_error("failed writing stdout", err))?,
    }

    Ok(SUCCESS)
}

fn resolve_json(args: &PackArgs) -> CliResult<serde_json::Value> {
    let text = if let Some(json) = &args.json {
        json.clone()
    } else if let Some(path) = &args.file {
        fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?
    } else {
        return Err(CliError::new(USAGE, "one of --json or --file is required"));
    };
    serde_json::from_str(&text).map_err(|err| CliError::new(USAGE, format!("invalid JSON: {err}")))
}

fn dtype(arg: DtypeArg) -> DType {
    match arg {
        DtypeArg::F64 => DType::F64,
        DtypeArg::I64 => DType::I64,
    }
}

fn opcode(arg: OpArg) -> OpCode {
    match arg {
        OpArg::MatMul => OpCode::MatMul,
    }
}

fn msg_type(arg: MsgTypeArg) -> MsgType {
    match arg {
        MsgTypeArg::Request => MsgType::Request,
        MsgTypeArg::Response => MsgType::Response,
        MsgTypeArg::Error => MsgType::Error,
    }
}

fn targets(args: &[TargetArg]) -> TargetFlags {
    args.iter().fold(TargetFlags::new(), |flags, arg| match arg {
        TargetArg::Cpu => flags.with_cpu(),
        TargetArg::Gpu => flags.with_gpu(),
        TargetArg::Fpga => flags.with_fpga(),
    })
}
