/*!
This module provides `Buffer`, a handle that hands items over to a worker thread that batches
and flushes them.

Every operation is a rendezvous with the worker: `push` and `flush` succeed once the worker
has taken the item or request and fail with `BufferError::TimedOut` if that did not happen
within configured timeout. While the flusher is running the worker takes nothing, so a slow
flusher shows up as timeouts for all callers.
!*/

use crate::error::{BufferError, BuildError};
use crate::flusher::Flusher;
use crate::options::Options;
use crate::worker::{Endpoints, Worker};
use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use log::{debug, error, warn};

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

#[derive(Debug)]
enum Lifecycle {
    /// Holds the shutdown sender; dropping it tells the worker to drain and stop.
    Open(Sender<()>),
    /// Shutdown was signalled; worker may still be flushing.
    Closing,
    Closed,
}

/// Batching buffer handle.
///
/// All operations take `&self` so the buffer can be shared between threads with `Arc`.
///
/// Dropping the handle without calling `close` also makes the worker flush outstanding items
/// and exit, but nothing waits for it.
#[derive(Debug)]
pub struct Buffer<T> {
    items: Sender<T>,
    flush_requests: Sender<()>,
    done: Receiver<()>,
    lifecycle: Mutex<Lifecycle>,
    worker: Mutex<Option<JoinHandle<()>>>,
    options: Options,
}

impl<T: Send + 'static> Buffer<T> {
    /// Validates `options` and starts the worker thread that will call `flusher` with batches.
    pub fn new(flusher: impl Flusher<T>, options: Options) -> Result<Buffer<T>, BuildError> {
        options.validate()?;

        let (items, items_rx) = crossbeam_channel::bounded(0);
        let (flush_requests, flush_rx) = crossbeam_channel::bounded(0);
        let (shutdown, shutdown_rx) = crossbeam_channel::bounded(0);
        let (done_tx, done) = crossbeam_channel::bounded(1);

        let worker = Worker::new(
            options.size,
            options.flush_interval,
            flusher,
            Endpoints {
                items: items_rx,
                flush_requests: flush_rx,
                shutdown: shutdown_rx,
                done: done_tx,
            },
        );

        let worker = thread::Builder::new()
            .name("flush-buffer worker".to_string())
            .spawn(move || worker.run())
            .map_err(BuildError::Spawn)?;

        debug!("started buffer with {:?}", options);

        Ok(Buffer {
            items,
            flush_requests,
            done,
            lifecycle: Mutex::new(Lifecycle::Open(shutdown)),
            worker: Mutex::new(Some(worker)),
            options,
        })
    }
}

impl<T> Buffer<T> {
    /// Hands `item` to the worker to be flushed with the next batch.
    ///
    /// On `Err(BufferError::TimedOut)` the item is dropped.
    pub fn push(&self, item: T) -> Result<(), BufferError> {
        if self.is_closed() {
            return Err(BufferError::Closed);
        }

        self.items
            .send_timeout(item, self.options.push_timeout)
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => {
                    debug!("push timed-out; item dropped");
                    BufferError::TimedOut
                }
                SendTimeoutError::Disconnected(_) => BufferError::Closed,
            })
    }

    /// Requests flush of outstanding items.
    ///
    /// Returns as soon as worker took the request; the flusher runs after that on the worker
    /// thread. If there is nothing outstanding the flusher is not called.
    pub fn flush(&self) -> Result<(), BufferError> {
        if self.is_closed() {
            return Err(BufferError::Closed);
        }

        self.flush_requests
            .send_timeout((), self.options.flush_timeout)
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => BufferError::TimedOut,
                SendTimeoutError::Disconnected(_) => BufferError::Closed,
            })
    }

    /// Flushes outstanding items and stops the worker.
    ///
    /// Returns `Err(BufferError::TimedOut)` if the worker did not stop within close timeout,
    /// most likely because the flusher is still running. Calling `close` again waits for the
    /// same shutdown to complete. Once closed, all operations return `Err(BufferError::Closed)`.
    pub fn close(&self) -> Result<(), BufferError> {
        {
            let mut lifecycle = self.lifecycle();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Closing) {
                Lifecycle::Closed => {
                    *lifecycle = Lifecycle::Closed;
                    return Err(BufferError::Closed);
                }
                Lifecycle::Open(shutdown) => {
                    debug!("signalling shutdown to worker");
                    drop(shutdown);
                }
                // Shutdown already signalled; wait for it again
                Lifecycle::Closing => (),
            }
        }

        match self.done.recv_timeout(self.options.close_timeout) {
            // Disconnected if other close call got the signal
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                *self.lifecycle() = Lifecycle::Closed;
                self.join_worker();
                debug!("buffer closed");
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("close timed-out waiting for worker to stop");
                Err(BufferError::TimedOut)
            }
        }
    }

    /// Checks if `close` was called.
    pub fn is_closed(&self) -> bool {
        !matches!(*self.lifecycle(), Lifecycle::Open(_))
    }

    /// Options this buffer was started with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    // Lock is never held while user code runs
    fn lifecycle(&self) -> MutexGuard<Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn join_worker(&self) {
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();

        if let Some(worker) = worker {
            if worker.join().is_err() {
                error!("buffer worker thread panicked");
            }
        }
    }
}
