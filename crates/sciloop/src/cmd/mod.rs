use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod encode;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive the loop-back link for a number of cycles.
    Run(RunArgs),
    /// Print the frame a data word encodes to.
    Encode(EncodeArgs),
    /// Check a data word against a check byte.
    Check(CheckArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn dispatch(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Control-loop cycles to drive.
    #[arg(long, default_value_t = 1000)]
    pub cycles: u64,

    /// 24-bit data word framed each cycle (hex or decimal, masked to 24
    /// bits). Overrides the sample pair.
    #[arg(long, value_parser = parse_u32, conflicts_with_all = ["hi", "lo"])]
    pub word: Option<u32>,

    /// High 12-bit sensor sample.
    #[arg(long, value_parser = parse_u32, default_value = "0x0978")]
    pub hi: u32,

    /// Low 12-bit sensor sample.
    #[arg(long, value_parser = parse_u32, default_value = "0x0536")]
    pub lo: u32,

    /// Seed of the rolling expected reference.
    #[arg(long, value_parser = parse_u8, default_value = "0x72")]
    pub seed: u8,

    /// Baud rate of the emulated link.
    #[arg(long, default_value_t = sciloop_driver::DEFAULT_BAUD)]
    pub baud: u32,

    /// Low-speed peripheral clock in Hz.
    #[arg(long, default_value_t = sciloop_driver::DEFAULT_LSPCLK_HZ)]
    pub lspclk: u32,

    /// FIFO depth of the emulated peripheral.
    #[arg(long, default_value_t = sciloop_driver::MAX_FIFO_DEPTH)]
    pub fifo_depth: usize,

    /// Receive FIFO trigger level.
    #[arg(long, default_value_t = sciloop_driver::DEFAULT_RX_TRIGGER)]
    pub rx_trigger: usize,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// 24-bit data word (hex or decimal, masked to 24 bits).
    #[arg(value_parser = parse_u32)]
    pub word: u32,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// 24-bit data word (hex or decimal, masked to 24 bits).
    #[arg(value_parser = parse_u32)]
    pub word: u32,

    /// Check byte to test.
    #[arg(value_parser = parse_u8)]
    pub crc: u8,

    /// Compare by equality instead of the fielded nonzero policy.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}

fn parse_u32(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    u32::from_str_radix(digits, radix).map_err(|err| format!("invalid number '{input}': {err}"))
}

fn parse_u8(input: &str) -> Result<u8, String> {
    let value = parse_u32(input)?;
    u8::try_from(value).map_err(|_| format!("'{input}' does not fit in a byte"))
}
