use sciloop_driver::SciDriver;
use sciloop_frame::{DataWord, Frame};
use serde::Serialize;
use tracing::{trace, warn};

use crate::state::{LinkPhase, LinkState};

/// Bytes staged per receive-completion event (the RX trigger level).
pub const RECEIVE_CHUNK: usize = 2;

/// Default seed for the rolling expected reference.
///
/// The bench historically seeds the reference from its check data, whose
/// first byte is `'r'`.
pub const DEFAULT_EXPECTED_SEED: u8 = b'r';

/// Configuration for a transfer coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Initial value of the rolling expected reference.
    pub expected_seed: u8,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            expected_seed: DEFAULT_EXPECTED_SEED,
        }
    }
}

/// Transfer counters, accumulated for the lifetime of a coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Frames pushed by the transmit-completion handler.
    pub transmit_events: u64,
    /// Receive-completion events handled.
    pub receive_events: u64,
    /// Deliveries that agreed with the rolling reference.
    pub matches: u64,
    /// Deliveries counted as corrupt. Never fatal.
    pub mismatches: u64,
}

/// Outcome of validating one staged delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// The delivery agreed with the rolling reference; the link is
    /// sendable again.
    Match,
    /// The delivery was counted as corrupt; the link stays blocked until
    /// a later delivery matches.
    Mismatch {
        received: [u8; RECEIVE_CHUNK],
        expected: [u8; RECEIVE_CHUNK],
    },
}

/// The half-duplex transfer state machine.
///
/// One coordinator owns one driver and one [`LinkState`]. The control loop
/// calls [`poll`](Self::poll) once per iteration; the peripheral's
/// completion events are delivered through
/// [`on_transmit_ready`](Self::on_transmit_ready) and
/// [`on_receive_complete`](Self::on_receive_complete), which are the only
/// suspension points of the protocol.
#[derive(Debug)]
pub struct Coordinator<D> {
    driver: D,
    state: LinkState,
    frame: Frame,
    received: [u8; RECEIVE_CHUNK],
    expected_cursor: u8,
    stats: LinkStats,
}

impl<D: SciDriver> Coordinator<D> {
    /// Build a coordinator with the default configuration.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, CoordinatorConfig::default())
    }

    /// Build a coordinator with explicit configuration.
    pub fn with_config(driver: D, config: CoordinatorConfig) -> Self {
        Self {
            driver,
            state: LinkState::new(),
            frame: Frame::encode(DataWord::new(0)),
            received: [0; RECEIVE_CHUNK],
            expected_cursor: config.expected_seed,
            stats: LinkStats::default(),
        }
    }

    /// One control-loop iteration.
    ///
    /// Re-frames `word` (check byte recomputed, never stale), arms the
    /// transmit line if the link is sendable (the first byte push happens
    /// inside the transmit handler, not here) and, if the receive handler
    /// has staged a delivery, consumes the flag and validates it.
    pub fn poll(&mut self, word: DataWord) -> Option<Validation> {
        self.frame = Frame::encode(word);

        if self.state.transmit_ready() {
            self.driver.arm_transmit_interrupt();
        }

        if self.state.take_receive_ready() {
            Some(self.validate())
        } else {
            None
        }
    }

    /// Transmit-completion handler: the peripheral can accept bytes.
    ///
    /// Pushes the whole current frame, hands the link to the receive side,
    /// and quiets the transmit line until the control loop rearms it.
    pub fn on_transmit_ready(&mut self) {
        self.driver.send(self.frame.as_bytes());
        self.state.clear_transmit_ready();
        self.driver.arm_receive_interrupt();
        self.driver.acknowledge_transmit();
        self.driver.disable_transmit_interrupt();
        self.stats.transmit_events += 1;
        trace!(frame = ?self.frame.as_bytes(), "frame pushed");
    }

    /// Receive-completion handler: a trigger level's worth of bytes is
    /// staged.
    ///
    /// Captures the chunk, overwriting whatever an unvalidated earlier
    /// event staged, and raises the flag the control loop consumes.
    pub fn on_receive_complete(&mut self) {
        let bytes = self.driver.receive(RECEIVE_CHUNK);
        // A short read must not leave a prior delivery's bytes in the
        // unfilled slots.
        self.received = [0; RECEIVE_CHUNK];
        for (slot, byte) in self.received.iter_mut().zip(&bytes) {
            *slot = *byte;
        }
        self.state.raise_receive_ready();
        self.stats.receive_events += 1;
        self.driver.acknowledge_receive();
        trace!(received = ?self.received, "delivery staged");
    }

    fn validate(&mut self) -> Validation {
        let expected = [self.expected_cursor, self.expected_cursor.wrapping_add(1)];

        // The fielded predicate, kept literally: a delivery only counts as
        // corrupt when *both* bytes disagree with the rolling reference.
        if self.received[0] != expected[0] && self.received[1] != expected[1] {
            self.stats.mismatches += 1;
            warn!(
                received = ?self.received,
                expected = ?expected,
                mismatches = self.stats.mismatches,
                "delivery mismatch"
            );
            Validation::Mismatch {
                received: self.received,
                expected,
            }
        } else {
            self.stats.matches += 1;
            self.state.raise_transmit_ready();
            self.driver.disable_receive_interrupt();
            self.expected_cursor = self.expected_cursor.wrapping_add(1);
            trace!(expected_cursor = self.expected_cursor, "delivery matched");
            Validation::Match
        }
    }

    /// The shared flag pair.
    pub fn state(&self) -> &LinkState {
        &self.state
    }

    /// The link's current derived phase.
    pub fn phase(&self) -> LinkPhase {
        self.state.phase()
    }

    /// Accumulated transfer counters.
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Current value of the rolling expected reference.
    pub fn expected_cursor(&self) -> u8 {
        self.expected_cursor
    }

    /// The outbound frame built by the latest poll.
    pub fn current_frame(&self) -> &Frame {
        &self.frame
    }

    /// Borrow the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutably borrow the underlying driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consume the coordinator and return the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every driver call so tests can assert on the handler
    /// protocol, and serves scripted receive bytes.
    #[derive(Default)]
    struct ScriptedSci {
        sent: Vec<u8>,
        staged: Vec<u8>,
        calls: Vec<&'static str>,
    }

    impl ScriptedSci {
        fn stage(&mut self, bytes: &[u8]) {
            self.staged.extend_from_slice(bytes);
        }
    }

    impl SciDriver for ScriptedSci {
        fn send(&mut self, bytes: &[u8]) {
            self.calls.push("send");
            self.sent.extend_from_slice(bytes);
        }

        fn receive(&mut self, count: usize) -> Vec<u8> {
            self.calls.push("receive");
            let take = count.min(self.staged.len());
            self.staged.drain(..take).collect()
        }

        fn arm_transmit_interrupt(&mut self) {
            self.calls.push("arm_tx");
        }

        fn disable_transmit_interrupt(&mut self) {
            self.calls.push("disable_tx");
        }

        fn arm_receive_interrupt(&mut self) {
            self.calls.push("arm_rx");
        }

        fn disable_receive_interrupt(&mut self) {
            self.calls.push("disable_rx");
        }

        fn acknowledge_transmit(&mut self) {
            self.calls.push("ack_tx");
        }

        fn acknowledge_receive(&mut self) {
            self.calls.push("ack_rx");
        }
    }

    fn coordinator_with_seed(seed: u8) -> Coordinator<ScriptedSci> {
        Coordinator::with_config(
            ScriptedSci::default(),
            CoordinatorConfig {
                expected_seed: seed,
            },
        )
    }

    #[test]
    fn poll_arms_without_pushing_bytes() {
        let mut coordinator = Coordinator::new(ScriptedSci::default());
        assert_eq!(coordinator.poll(DataWord::new(0x123456)), None);

        // The control loop only arms; the first push belongs to the
        // transmit handler.
        assert_eq!(coordinator.driver().calls, vec!["arm_tx"]);
        assert!(coordinator.driver().sent.is_empty());
    }

    #[test]
    fn transmit_handler_protocol() {
        let mut coordinator = Coordinator::new(ScriptedSci::default());
        coordinator.poll(DataWord::new(0x123456));
        coordinator.on_transmit_ready();

        assert_eq!(coordinator.driver().sent, vec![0x12, 0x34, 0x56, 0x13]);
        assert!(!coordinator.state().transmit_ready());
        assert_eq!(coordinator.phase(), LinkPhase::Transmitting);
        assert_eq!(
            coordinator.driver().calls,
            vec!["arm_tx", "send", "arm_rx", "ack_tx", "disable_tx"]
        );
        assert_eq!(coordinator.stats().transmit_events, 1);
    }

    #[test]
    fn receive_handler_stages_and_acknowledges() {
        let mut coordinator = Coordinator::new(ScriptedSci::default());
        coordinator.driver_mut().stage(&[0xAB, 0xCD]);
        coordinator.on_receive_complete();

        assert!(coordinator.state().receive_ready());
        assert_eq!(coordinator.stats().receive_events, 1);
        assert_eq!(coordinator.driver().calls, vec!["receive", "ack_rx"]);
    }

    #[test]
    fn full_cycle_returns_link_to_idle() {
        // Flag convergence: one transmit event, one matching receive
        // event, one validating poll, and the flags are back where a
        // fresh link starts.
        let mut coordinator = coordinator_with_seed(0x12);
        let word = DataWord::new(0x121314);

        coordinator.poll(word);
        coordinator.on_transmit_ready();
        coordinator.driver_mut().stage(&[0x12, 0x13]);
        coordinator.on_receive_complete();

        assert_eq!(coordinator.poll(word), Some(Validation::Match));
        assert!(coordinator.state().transmit_ready());
        assert!(!coordinator.state().receive_ready());
        assert_eq!(coordinator.stats().matches, 1);
        assert_eq!(coordinator.stats().mismatches, 0);
    }

    #[test]
    fn mismatch_counts_once_and_keeps_link_blocked() {
        let mut coordinator = coordinator_with_seed(0x12);
        let word = DataWord::new(0x121314);

        coordinator.poll(word);
        coordinator.on_transmit_ready();
        coordinator.driver_mut().stage(&[0xAA, 0xBB]);
        coordinator.on_receive_complete();

        let outcome = coordinator.poll(word);
        assert_eq!(
            outcome,
            Some(Validation::Mismatch {
                received: [0xAA, 0xBB],
                expected: [0x12, 0x13],
            })
        );
        assert_eq!(coordinator.stats().mismatches, 1);
        // The link stays blocked: no resend until a delivery matches.
        assert!(!coordinator.state().transmit_ready());
        // The cursor holds its position on a mismatch.
        assert_eq!(coordinator.expected_cursor(), 0x12);
    }

    #[test]
    fn single_agreeing_byte_takes_the_match_path() {
        // The fielded predicate only counts a mismatch when both bytes
        // disagree; one agreeing byte is accepted. Preserved behavior.
        let mut coordinator = coordinator_with_seed(0x12);
        let word = DataWord::new(0x121314);

        coordinator.poll(word);
        coordinator.on_transmit_ready();
        coordinator.driver_mut().stage(&[0x12, 0xFF]);
        coordinator.on_receive_complete();

        assert_eq!(coordinator.poll(word), Some(Validation::Match));
        assert_eq!(coordinator.stats().matches, 1);
    }

    #[test]
    fn cursor_advances_only_on_match() {
        let mut coordinator = coordinator_with_seed(0xFF);
        let word = DataWord::new(0xFF00AA);

        coordinator.poll(word);
        coordinator.on_transmit_ready();
        coordinator.driver_mut().stage(&[0xFF, 0x00]);
        coordinator.on_receive_complete();
        coordinator.poll(word);

        // Wrapping advance: 0xFF rolls to 0x00.
        assert_eq!(coordinator.expected_cursor(), 0x00);
    }

    #[test]
    fn later_receive_event_overwrites_unvalidated_delivery() {
        let mut coordinator = coordinator_with_seed(0x01);

        coordinator.driver_mut().stage(&[0x10, 0x20]);
        coordinator.on_receive_complete();
        coordinator.driver_mut().stage(&[0x01, 0x02]);
        coordinator.on_receive_complete();

        // Validation sees only the latest chunk.
        coordinator.state().clear_transmit_ready();
        assert_eq!(coordinator.poll(DataWord::new(0)), Some(Validation::Match));
    }

    #[test]
    fn short_read_never_validates_stale_bytes() {
        let mut coordinator = coordinator_with_seed(0x01);

        // Full delivery staged but never validated, then a short one.
        coordinator.driver_mut().stage(&[0x01, 0x02]);
        coordinator.on_receive_complete();
        coordinator.driver_mut().stage(&[0xAA]);
        coordinator.on_receive_complete();

        // The unfilled slot is zeroed, not the prior delivery's 0x02;
        // both bytes disagree with the reference, so this is a mismatch.
        coordinator.state().clear_transmit_ready();
        assert_eq!(
            coordinator.poll(DataWord::new(0)),
            Some(Validation::Mismatch {
                received: [0xAA, 0x00],
                expected: [0x01, 0x02],
            })
        );
    }

    #[test]
    fn frame_is_rebuilt_every_poll() {
        let mut coordinator = Coordinator::new(ScriptedSci::default());
        coordinator.poll(DataWord::new(0x123456));
        assert_eq!(coordinator.current_frame().as_bytes(), &[0x12, 0x34, 0x56, 0x13]);

        coordinator.poll(DataWord::new(0x978536));
        assert_eq!(coordinator.current_frame().as_bytes(), &[0x97, 0x85, 0x36, 0x31]);
    }
}
