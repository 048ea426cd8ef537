use sciloop_driver::DriverError;

/// Errors that can occur while setting up a link.
///
/// Validation mismatches are deliberately absent: corrupted deliveries are
/// counted in [`LinkStats`](crate::LinkStats), not raised as errors. A
/// stalled link is likewise not an error; it ends the run and is reported
/// in [`LinkReport`](crate::LinkReport).
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Peripheral configuration was rejected.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
