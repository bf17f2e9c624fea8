use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

/// Periodic flush trigger.
///
/// Receiver is never ready if interval is zero or the ticker was stopped.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    ticks: Receiver<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Ticker {
        Ticker {
            interval,
            ticks: Self::start(interval),
        }
    }

    fn start(interval: Duration) -> Receiver<Instant> {
        if interval.is_zero() {
            crossbeam_channel::never()
        } else {
            crossbeam_channel::tick(interval)
        }
    }

    /// Receiver delivering ticks.
    pub fn ticks(&self) -> &Receiver<Instant> {
        &self.ticks
    }

    /// Cancels pending ticks.
    pub fn stop(&mut self) {
        self.ticks = crossbeam_channel::never();
    }

    /// Starts counting full interval again from now.
    pub fn restart(&mut self) {
        self.ticks = Self::start(self.interval);
    }
}
