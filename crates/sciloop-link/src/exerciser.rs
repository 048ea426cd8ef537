use sciloop_driver::{LoopbackConfig, LoopbackSci, SciEvent};
use sciloop_frame::DataWord;
use serde::Serialize;
use tracing::{debug, info};

use crate::coordinator::{Coordinator, CoordinatorConfig, LinkStats};
use crate::error::Result;
use crate::state::LinkPhase;

/// Summary of an exercising run.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    /// Control-loop iterations actually executed.
    pub cycles: u64,
    /// Transfer counters accumulated over the run.
    pub stats: LinkStats,
    /// Link phase when the run ended.
    pub final_phase: LinkPhase,
    /// Iteration at which the link stalled, if it did.
    ///
    /// A stalled link has a transfer in flight and no completion line that
    /// can ever fire. On hardware that is watchdog territory; the host
    /// pump ends the run and reports it here instead of spinning.
    pub stalled_at: Option<u64>,
    /// Bytes the peripheral dropped at a full receive FIFO.
    pub dropped_bytes: u64,
}

/// Host-side control loop driving a [`Coordinator`] over the software
/// loop-back peripheral.
///
/// Each iteration mirrors the firmware's main loop: frame the iteration's
/// data word, arm if sendable, validate any staged delivery, then deliver
/// at most one pending completion event, standing in for the interrupt
/// that would preempt the loop on hardware.
#[derive(Debug)]
pub struct Exerciser {
    coordinator: Coordinator<LoopbackSci>,
    cycles: u64,
    stalled_at: Option<u64>,
}

impl Exerciser {
    /// Wrap an existing coordinator.
    pub fn new(coordinator: Coordinator<LoopbackSci>) -> Self {
        Self {
            coordinator,
            cycles: 0,
            stalled_at: None,
        }
    }

    /// Build the loop-back peripheral and coordinator in one step.
    pub fn with_loopback(
        loopback: LoopbackConfig,
        coordinator: CoordinatorConfig,
    ) -> Result<Self> {
        let sci = LoopbackSci::new(loopback)?;
        Ok(Self::new(Coordinator::with_config(sci, coordinator)))
    }

    /// Drive the link for one iteration per data word.
    ///
    /// Ends early when the link stalls; the report carries the counters
    /// either way.
    pub fn run(&mut self, words: impl IntoIterator<Item = DataWord>) -> LinkReport {
        for word in words {
            self.cycles += 1;
            self.coordinator.poll(word);

            match self.coordinator.driver_mut().pending_event() {
                Some(SciEvent::ReceiveReady) => self.coordinator.on_receive_complete(),
                Some(SciEvent::TransmitReady) => self.coordinator.on_transmit_ready(),
                None => {
                    if self.coordinator.phase() == LinkPhase::Transmitting {
                        self.stalled_at = Some(self.cycles);
                        debug!(cycle = self.cycles, "link stalled, ending run");
                        break;
                    }
                }
            }
        }

        let report = self.report();
        info!(
            cycles = report.cycles,
            matches = report.stats.matches,
            mismatches = report.stats.mismatches,
            stalled = report.stalled_at.is_some(),
            "run finished"
        );
        report
    }

    /// Drive the link with the same data word for up to `cycles`
    /// iterations, the bench's historical mode of operation.
    pub fn run_word(&mut self, word: DataWord, cycles: u64) -> LinkReport {
        self.run((0..cycles).map(|_| word))
    }

    /// Snapshot the current counters without running.
    pub fn report(&self) -> LinkReport {
        LinkReport {
            cycles: self.cycles,
            stats: self.coordinator.stats(),
            final_phase: self.coordinator.phase(),
            stalled_at: self.stalled_at,
            dropped_bytes: self.coordinator.driver().dropped_bytes(),
        }
    }

    /// Borrow the coordinator.
    pub fn coordinator(&self) -> &Coordinator<LoopbackSci> {
        &self.coordinator
    }

    /// Mutably borrow the coordinator.
    pub fn coordinator_mut(&mut self) -> &mut Coordinator<LoopbackSci> {
        &mut self.coordinator
    }
}
