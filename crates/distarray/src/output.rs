use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use distarray_frame::{Frame, TargetFlags};
use distarray_tensor::Tensor;
use serde::Serialize;

use crate::exit::CliResult;
use crate::json::tensor_to_json;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct TensorOutput {
    dtype: String,
    shape: Vec<i64>,
    strides: Vec<i64>,
    size: usize,
    nbytes: usize,
    values: serde_json::Value,
}

#[derive(Serialize)]
struct MessageOutput {
    total_len: usize,
    msg_type: &'static str,
    opcode: &'static str,
    targets: Vec<&'static str>,
    seq_id: u32,
    payload_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    tensor: Option<TensorOutput>,
}

pub fn print_message(frame: &Frame, tensor: Option<&Tensor>, format: OutputFormat) -> CliResult<()> {
    let tensor_out = match tensor {
        Some(t) => Some(tensor_output(t)?),
        None => None,
    };
    let out = MessageOutput {
        total_len: frame.wire_size(),
        msg_type: frame.msg_type.name(),
        opcode: frame.opcode.name(),
        targets: target_names(frame.flags),
        seq_id: frame.seq_id,
        payload_size: frame.payload.len(),
        tensor: tensor_out,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["total_len".to_string(), out.total_len.to_string()])
                .add_row(vec!["msg_type".to_string(), out.msg_type.to_string()])
                .add_row(vec!["opcode".to_string(), out.opcode.to_string()])
                .add_row(vec!["targets".to_string(), out.targets.join("|")])
                .add_row(vec!["seq_id".to_string(), out.seq_id.to_string()])
                .add_row(vec![
                    "payload_size".to_string(),
                    out.payload_size.to_string(),
                ]);
            if let Some(t) = &out.tensor {
                table
                    .add_row(vec!["dtype".to_string(), t.dtype.clone()])
                    .add_row(vec!["shape".to_string(), format!("{:?}", t.shape)])
                    .add_row(vec!["strides".to_string(), format!("{:?}", t.strides)])
                    .add_row(vec!["values".to_string(), t.values.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} targets={} seq={} payload={}B",
                out.msg_type,
                out.opcode,
                if out.targets.is_empty() {
                    "none".to_string()
                } else {
                    out.targets.join("|")
                },
                out.seq_id,
                out.payload_size
            );
            if let Some(t) = &out.tensor {
                println!(
                    "{} shape={:?} strides={:?} values={}",
                    t.dtype, t.shape, t.strides, t.values
                );
            }
        }
    }
    Ok(())
}

pub fn print_tensor(tensor: &Tensor, format: OutputFormat) -> CliResult<()> {
    let out = tensor_output(tensor)?;
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["dtype".to_string(), out.dtype.clone()])
                .add_row(vec!["shape".to_string(), format!("{:?}", out.shape)])
                .add_row(vec!["strides".to_string(), format!("{:?}", out.strides)])
                .add_row(vec!["size".to_string(), out.size.to_string()])
                .add_row(vec!["nbytes".to_string(), out.nbytes.to_string()])
                .add_row(vec!["values".to_string(), out.values.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} shape={:?} strides={:?} values={}",
                out.dtype, out.shape, out.strides, out.values
            );
        }
    }
    Ok(())
}

pub fn write_wire_bytes(data: &[u8]) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    out.write_all(data)?;
    out.flush()
}

fn tensor_output(tensor: &Tensor) -> CliResult<TensorOutput> {
    Ok(TensorOutput {
        dtype: tensor.dtype().to_string(),
        shape: tensor.shape().to_vec(),
        strides: tensor.strides().to_vec(),
        size: tensor.size(),
        nbytes: tensor.nbytes(),
        values: tensor_to_json(tensor)?,
    })
}

pub fn target_names(flags: TargetFlags) -> Vec<&'static str> {
    let mut names = Vec::new();
    if flags.has_cpu() {
        names.push("CPU");
    }
    if flags.has_gpu() {
        names.push("GPU");
    }
    if flags.has_fpga() {
        names.push("FPGA");
    }
    names
}
