use std::fs;
use std::io::Read;

use bytes::Bytes;
use distarray_frame::{parse_frame, MsgType};
use distarray_tensor::decode_tensor;
use tracing::debug;

use crate::cmd::InspectArgs;
use crate::exit::{frame_error, io_error, tensor_error, CliResult, SUCCESS};
use crate::output::{print_message, print_tensor, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = read_input(&args)?;
    debug!(len = wire.len(), bare = args.bare, "inspecting wire bytes");

    if args.bare {
        let tensor = decode_tensor(&wire).map_err(|err| tensor_error("decode failed", err))?;
        print_tensor(&tensor, format)?;
        return Ok(SUCCESS);
    }

    let frame = parse_frame(&wire).map_err(|err| frame_error("parse failed", err))?;

    // Error frames carry a status blob, not an encoded tensor.
    let tensor = if frame.msg_type == MsgType::Error || frame.payload.is_empty() {
        None
    } else {
        Some(decode_tensor(&frame.payload).map_err(|err| tensor_error("decode failed", err))?)
    };

    print_message(&frame, tensor.as_ref(), format)?;
    Ok(SUCCESS)
}

fn read_input(args: &InspectArgs) -> CliResult<Bytes> {
    match &args.input {
        Some(path) => fs::read(path)
            .map(Bytes::from)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(Bytes::from(buf))
        }
    }
}
