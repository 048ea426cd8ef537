use std::fmt;

use sciloop_link::LinkError;

// Stable exit codes for scripting against the bench.
pub const SUCCESS: i32 = 0;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        // The only link-layer error class is rejected peripheral
        // configuration, and that configuration comes from CLI flags.
        LinkError::Driver(err) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}
