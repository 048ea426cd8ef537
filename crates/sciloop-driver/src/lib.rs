//! Serial peripheral abstraction for sciloop.
//!
//! The transfer protocol never touches peripheral registers directly; it
//! consumes exactly eight primitives: push bytes, pull staged bytes,
//! arm/disable the two completion interrupt lines, and acknowledge their
//! latched flags. [`SciDriver`] is that seam.
//!
//! [`LoopbackSci`] is a software rendition of the peripheral in digital
//! loop-back mode: transmitted bytes cross over into the receive FIFO, and
//! [`LoopbackSci::pending_event`] reports which completion line would fire
//! next. It stands in for the hardware in tests and in the CLI exerciser.

pub mod error;
pub mod loopback;
pub mod traits;

pub use error::{DriverError, Result};
pub use loopback::{
    LoopbackConfig, LoopbackSci, DEFAULT_BAUD, DEFAULT_LSPCLK_HZ, DEFAULT_RX_TRIGGER,
    MAX_FIFO_DEPTH,
};
pub use traits::{SciDriver, SciEvent};
