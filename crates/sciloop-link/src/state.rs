use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// The two cross-cutting link flags.
///
/// This is the sole synchronization point between the completion handlers
/// and the control loop, and ownership of each flag is one-directional:
///
/// - `transmit_ready`: cleared by the transmit handler, raised by the
///   control loop after a validated delivery. Starts raised, so the link
///   boots idle and sendable.
/// - `receive_ready`: raised by the receive handler, consumed by the
///   control loop. Starts lowered.
///
/// The flags are atomics because the handlers may preempt the control loop
/// at any point.
#[derive(Debug)]
pub struct LinkState {
    transmit_ready: AtomicBool,
    receive_ready: AtomicBool,
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkState {
    /// A fresh link: sendable, nothing received.
    pub fn new() -> Self {
        Self {
            transmit_ready: AtomicBool::new(true),
            receive_ready: AtomicBool::new(false),
        }
    }

    /// Whether the link can start a transmission.
    pub fn transmit_ready(&self) -> bool {
        self.transmit_ready.load(Ordering::Acquire)
    }

    /// Whether a delivery is staged and awaiting validation.
    pub fn receive_ready(&self) -> bool {
        self.receive_ready.load(Ordering::Acquire)
    }

    /// The flag pair as an explicit tagged state.
    pub fn phase(&self) -> LinkPhase {
        match (self.transmit_ready(), self.receive_ready()) {
            (true, false) => LinkPhase::Idle,
            (false, false) => LinkPhase::Transmitting,
            (false, true) => LinkPhase::AwaitingValidation,
            (true, true) => LinkPhase::BothPending,
        }
    }

    pub(crate) fn clear_transmit_ready(&self) {
        self.transmit_ready.store(false, Ordering::Release);
    }

    pub(crate) fn raise_transmit_ready(&self) {
        self.transmit_ready.store(true, Ordering::Release);
    }

    pub(crate) fn raise_receive_ready(&self) {
        self.receive_ready.store(true, Ordering::Release);
    }

    /// Consume the receive flag, returning whether it was raised.
    pub(crate) fn take_receive_ready(&self) -> bool {
        self.receive_ready.swap(false, Ordering::AcqRel)
    }
}

/// The link's position in the half-duplex cycle, derived from the flag
/// pair.
///
/// The protocol stores the two flags independently rather than a single
/// state word (the transmit and receive lines really are independent),
/// but every reachable combination has a name, so nothing hides in the
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPhase {
    /// Sendable, nothing in flight.
    Idle,
    /// Frame pushed, awaiting completion of the round trip.
    Transmitting,
    /// Bytes staged by the receive handler, awaiting validation.
    AwaitingValidation,
    /// Sendable again while a prior delivery still awaits validation.
    BothPending,
}

impl std::fmt::Display for LinkPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LinkPhase::Idle => "idle",
            LinkPhase::Transmitting => "transmitting",
            LinkPhase::AwaitingValidation => "awaiting-validation",
            LinkPhase::BothPending => "both-pending",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_idle_and_sendable() {
        let state = LinkState::new();
        assert!(state.transmit_ready());
        assert!(!state.receive_ready());
        assert_eq!(state.phase(), LinkPhase::Idle);
    }

    #[test]
    fn phase_covers_every_flag_combination() {
        let state = LinkState::new();

        state.clear_transmit_ready();
        assert_eq!(state.phase(), LinkPhase::Transmitting);

        state.raise_receive_ready();
        assert_eq!(state.phase(), LinkPhase::AwaitingValidation);

        state.raise_transmit_ready();
        assert_eq!(state.phase(), LinkPhase::BothPending);
    }

    #[test]
    fn take_receive_ready_consumes_once() {
        let state = LinkState::new();
        state.raise_receive_ready();
        assert!(state.take_receive_ready());
        assert!(!state.take_receive_ready());
        assert!(!state.receive_ready());
    }
}
