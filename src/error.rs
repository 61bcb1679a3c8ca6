use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator.
///
/// The only failure mode that actually propagates out of the simulation
/// core is a loader I/O failure; every other failure kind in the system
/// (memory bounds violations, unsupported opcodes, out-of-range register
/// indices) is a policy-driven diagnostic handled locally by the
/// component that detects it, not a `Result` threaded up to `main`.
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("failed to load program: {0}")]
    Loader(#[from] LoaderError),
}

/// Errors from reading a program binary off disk.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to open program file '{0}': {1}")]
    FileOpen(PathBuf, #[source] std::io::Error),
}

/// Type alias for `Result` with `SimulatorError`.
pub type SimulatorResult<T> = Result<T, SimulatorError>;
