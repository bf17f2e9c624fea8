use crate::batch::Batch;
use crate::flusher::Flusher;
use crate::ticker::Ticker;
use crossbeam_channel::{select, Receiver, Sender};
use log::{debug, error, trace};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Taking items and requests.
    Open,
    /// Shutdown requested; flushing what is left.
    Draining,
    Stopped,
}

#[derive(Debug)]
enum Event<T> {
    Item(T),
    Tick,
    Flush,
    Shutdown,
}

/// Worker end of the buffer channels.
#[derive(Debug)]
pub struct Endpoints<T> {
    pub items: Receiver<T>,
    pub flush_requests: Receiver<()>,
    /// Disconnected when shutdown is requested.
    pub shutdown: Receiver<()>,
    /// Signalled once after worker has stopped.
    pub done: Sender<()>,
}

/// Owns the batch and the ticker; the only place the flusher is called from.
pub struct Worker<T, F> {
    batch: Batch<T>,
    flusher: F,
    ticker: Ticker,
    endpoints: Endpoints<T>,
    state: WorkerState,
}

impl<T, F: Flusher<T>> Worker<T, F> {
    pub fn new(
        size: usize,
        flush_interval: Duration,
        flusher: F,
        endpoints: Endpoints<T>,
    ) -> Worker<T, F> {
        Worker {
            batch: Batch::new(size),
            flusher,
            ticker: Ticker::new(flush_interval),
            endpoints,
            state: WorkerState::Open,
        }
    }

    /// Runs until shutdown is requested or the buffer handle is gone, then flushes outstanding
    /// items and signals `done`.
    pub fn run(mut self) {
        debug!("buffer worker started");

        while self.state == WorkerState::Open {
            // If more than one source is ready, one is picked at random
            let event = select! {
                recv(self.endpoints.items) -> item => match item {
                    Ok(item) => Event::Item(item),
                    // Handle dropped
                    Err(_) => Event::Shutdown,
                },
                recv(self.ticker.ticks()) -> _ => Event::Tick,
                recv(self.endpoints.flush_requests) -> request => match request {
                    Ok(()) => Event::Flush,
                    Err(_) => Event::Shutdown,
                },
                recv(self.endpoints.shutdown) -> _ => Event::Shutdown,
            };

            if self.handle(event) {
                self.flush();
            }
        }

        self.state = WorkerState::Stopped;
        let Worker {
            batch,
            flusher,
            mut ticker,
            endpoints,
            state,
        } = self;

        // Flusher drop may write out its own buffers; done means it has finished
        ticker.stop();
        drop(flusher);
        drop(batch);
        debug!("buffer worker {:?}", state);

        // Nobody may be waiting for it
        let _ = endpoints.done.try_send(());
    }

    /// Applies event returning `true` if batch needs to be flushed now.
    fn handle(&mut self, event: Event<T>) -> bool {
        match event {
            Event::Item(item) => {
                trace!("item appended to batch");
                self.batch.append(item)
            }
            Event::Tick | Event::Flush => !self.batch.is_empty(),
            Event::Shutdown => {
                debug!("shutdown requested; draining {} items", self.batch.len());
                self.state = WorkerState::Draining;
                !self.batch.is_empty()
            }
        }
    }

    fn flush(&mut self) {
        self.ticker.stop();

        let items = self.batch.split_off();
        debug!("flushing batch of {} items", items.len());

        let flusher = &mut self.flusher;
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| flusher.write(items))) {
            error!("flusher panicked; batch lost: {}", panic_message(&*panic));
        }

        if self.state == WorkerState::Open {
            self.ticker.restart();
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
