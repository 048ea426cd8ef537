/// Errors raised while configuring a peripheral model.
///
/// These are the fatal class of failure: an impossible configuration is
/// rejected at construction and never recovered from at runtime. Data
/// integrity mismatches are not errors anywhere in this workspace; they
/// surface as counted outcomes in the link layer.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The FIFO depth is zero or exceeds what the hardware provides.
    #[error("invalid FIFO depth {depth} (hardware FIFOs hold 1..={max} bytes)")]
    InvalidFifoDepth { depth: usize, max: usize },

    /// The RX trigger level is zero or exceeds the FIFO depth.
    #[error("invalid RX trigger level {level} for FIFO depth {depth}")]
    InvalidTriggerLevel { level: usize, depth: usize },

    /// The baud rate is zero.
    #[error("baud rate must be nonzero")]
    ZeroBaud,

    /// The baud divisor does not fit the 16-bit baud registers.
    #[error("baud rate {baud} at {lspclk} Hz needs divisor {divisor}, beyond the 16-bit baud registers")]
    BaudOutOfRange { baud: u32, lspclk: u32, divisor: u32 },
}

pub type Result<T> = std::result::Result<T, DriverError>;
