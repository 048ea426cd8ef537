//! Half-duplex transfer coordination for serial loop-back exercising.
//!
//! This is the protocol layer of sciloop. A [`Coordinator`] drives one
//! serial link through repeated send/receive/validate cycles:
//!
//! - the control loop frames a fresh data word each iteration and arms the
//!   transmit line whenever the link is sendable
//! - the transmit-completion handler pushes the frame and hands the link
//!   to the receive side
//! - the receive-completion handler stages inbound bytes and raises a flag
//!   the control loop consumes to validate them
//!
//! The two flags in [`LinkState`] are the only state shared across the
//! handler/control-loop boundary. [`Exerciser`] pumps a software loop-back
//! peripheral through the same cycle on the host.

pub mod coordinator;
pub mod error;
pub mod exerciser;
pub mod state;

pub use coordinator::{
    Coordinator, CoordinatorConfig, LinkStats, Validation, DEFAULT_EXPECTED_SEED, RECEIVE_CHUNK,
};
pub use error::{LinkError, Result};
pub use exerciser::{Exerciser, LinkReport};
pub use state::{LinkPhase, LinkState};
