/// A completion line the peripheral can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SciEvent {
    /// The transmit side can accept more bytes.
    TransmitReady,
    /// The receive FIFO holds at least a trigger level's worth of bytes.
    ReceiveReady,
}

/// The serial peripheral seam consumed by the transfer protocol.
///
/// Implementations model (or wrap) a serial unit with independent transmit
/// and receive completion lines. The contract mirrors the hardware:
///
/// - primitives never fail; misuse shows up as dropped bytes or stale
///   reads, exactly as it would on the device
/// - `send` drops bytes that overflow the transmit queue; callers avoid
///   that through the protocol's ready flag, not through return values
/// - `receive` is only meaningful inside a receive-completion handler,
///   when staged bytes are known to be present
/// - each acknowledge must be called once per completion event, or the
///   latched flag re-fires the line immediately
pub trait SciDriver {
    /// Enqueue bytes for transmission. Bytes beyond the queue's capacity
    /// are silently dropped.
    fn send(&mut self, bytes: &[u8]);

    /// Dequeue up to `count` bytes already staged by the receive side.
    fn receive(&mut self, count: usize) -> Vec<u8>;

    /// Enable the transmit-completion line.
    fn arm_transmit_interrupt(&mut self);

    /// Disable the transmit-completion line.
    fn disable_transmit_interrupt(&mut self);

    /// Enable the receive-completion line.
    fn arm_receive_interrupt(&mut self);

    /// Disable the receive-completion line.
    fn disable_receive_interrupt(&mut self);

    /// Clear the latched transmit interrupt flag.
    fn acknowledge_transmit(&mut self);

    /// Clear the latched receive interrupt and overflow flags.
    fn acknowledge_receive(&mut self);
}
