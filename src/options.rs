use crate::error::BuildError;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Buffer configuration.
///
/// All durations are non-negative by type. A zero `flush_interval` disables periodic
/// flushing; a zero timeout makes the operation succeed only if the worker is already
/// waiting for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of items in a batch; reaching it flushes the batch.
    pub size: usize,
    /// Flush outstanding items this often.
    pub flush_interval: Duration,
    /// How long `push` waits for the worker to take the item.
    pub push_timeout: Duration,
    /// How long `flush` waits for the worker to take the request.
    pub flush_timeout: Duration,
    /// How long `close` waits for the worker to drain and stop.
    pub close_timeout: Duration,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            size: 0,
            flush_interval: Duration::ZERO,
            push_timeout: DEFAULT_TIMEOUT,
            flush_timeout: DEFAULT_TIMEOUT,
            close_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Options {
    /// Sets the maximum number of items in a batch.
    pub fn with_size(mut self, size: usize) -> Options {
        self.size = size;
        self
    }

    /// Sets the interval between automatic flushes; `Duration::ZERO` disables them.
    pub fn with_flush_interval(mut self, interval: Duration) -> Options {
        self.flush_interval = interval;
        self
    }

    pub fn with_push_timeout(mut self, timeout: Duration) -> Options {
        self.push_timeout = timeout;
        self
    }

    pub fn with_flush_timeout(mut self, timeout: Duration) -> Options {
        self.flush_timeout = timeout;
        self
    }

    pub fn with_close_timeout(mut self, timeout: Duration) -> Options {
        self.close_timeout = timeout;
        self
    }

    /// Checks options returning error naming first invalid one.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.size == 0 {
            return Err(BuildError::InvalidOption {
                field: "size",
                reason: "size cannot be zero",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    pub use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults() {
        let options = Options::default();

        assert_eq!(options.flush_interval, Duration::ZERO);
        assert_eq!(options.push_timeout, Duration::from_secs(1));
        assert_eq!(options.flush_timeout, Duration::from_secs(1));
        assert_eq!(options.close_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_zero_size() {
        assert_matches!(
            Options::default().validate(),
            Err(BuildError::InvalidOption { field: "size", .. })
        );
    }

    #[test]
    fn test_setters() {
        let options = Options::default()
            .with_size(10)
            .with_flush_interval(Duration::from_millis(200))
            .with_push_timeout(Duration::ZERO)
            .with_flush_timeout(Duration::from_millis(10))
            .with_close_timeout(Duration::from_secs(5));

        assert_matches!(options.validate(), Ok(()));
        assert_eq!(options.size, 10);
        assert_eq!(options.flush_interval, Duration::from_millis(200));
        assert_eq!(options.push_timeout, Duration::ZERO);
        assert_eq!(options.flush_timeout, Duration::from_millis(10));
        assert_eq!(options.close_timeout, Duration::from_secs(5));
    }
}
