use std::io;
use thiserror::Error;

/// The error returned by `Buffer` operations that did not happen.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Error)]
pub enum BufferError {
    /// Configured timeout elapsed before the worker took the request; nothing was done.
    #[error("operation timed-out")]
    TimedOut,
    /// The buffer was closed and will not accept any more operations.
    #[error("buffer is closed")]
    Closed,
}

/// The error returned by `Buffer::new` when the buffer could not be started.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Option `field` has a value the buffer cannot work with.
    #[error("invalid option {field}: {reason}")]
    InvalidOption {
        field: &'static str,
        reason: &'static str,
    },
    #[error("failed to start worker thread")]
    Spawn(#[source] io::Error),
}
