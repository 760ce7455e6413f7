use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("distarray {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!("frame header: {} bytes", distarray_frame::HEADER_SIZE);
    println!(
        "tensor header: {} bytes",
        distarray_tensor::FIXED_HEADER_SIZE
    );
    println!("dtypes: float64, int64");
    println!("opcodes: MAT_MUL");
    println!(
        "host: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    Ok(SUCCESS)
}
