/*!
Buffer that collects items pushed from any number of threads and flushes them in batches.

A single worker thread owns the batch. It calls the `Flusher` when:
* the batch reached `size` items,
* `flush_interval` has elapsed since the last flush and the batch is not empty,
* `Buffer::flush` was called and the batch is not empty,
* the buffer is being closed (or its handle dropped) and the batch is not empty.

All hand-overs to the worker are unbuffered so `push`, `flush` and `close` wait for the worker
only up to their configured timeouts and return `BufferError::TimedOut` otherwise.

# Example

```rust
use flush_buffer::{Buffer, Options};
use std::time::Duration;

let (sender, batches) = crossbeam_channel::unbounded();

let buffer = Buffer::new(
    move |items: Vec<u32>| sender.send(items).unwrap(),
    Options::default()
        .with_size(3)
        .with_flush_interval(Duration::from_secs(10)),
)
.unwrap();

for i in 1..=4 {
    buffer.push(i).unwrap();
}

// Flushes the last item
buffer.close().unwrap();

assert_eq!(batches.iter().collect::<Vec<_>>(), [vec![1, 2, 3], vec![4]]);
```
!*/

mod batch;
mod ticker;
mod worker;

mod error;
pub use error::*;
mod options;
pub use options::*;
mod flusher;
pub use flusher::*;
mod buffer;
pub use buffer::*;
