/// Ordered items waiting to be flushed, bounded to `max_size`.
///
/// Item buffer is allocated once and reused between batches.
#[derive(Debug)]
pub struct Batch<I> {
    items: Vec<I>,
    max_size: usize,
}

impl<I> Batch<I> {
    /// Creates batch holding at most `max_size` items.
    ///
    /// Panics if `max_size == 0`.
    pub fn new(max_size: usize) -> Batch<I> {
        assert!(max_size > 0, "Batch::new bad max_size");

        Batch {
            items: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Appends item to batch and returns `true` if the batch has now reached `max_size`.
    ///
    /// It is a contract error to append to a full batch.
    /// Panics if trying to append a batch that reached its `max_size` limit.
    pub fn append(&mut self, item: I) -> bool {
        if self.is_full() {
            panic!("Batch append on full batch");
        }

        self.items.push(item);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_size
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Moves items out to newly allocated `Vec` keeping internal buffer for the next batch.
    pub fn split_off(&mut self) -> Vec<I> {
        self.items.split_off(0)
    }
}

#[cfg(test)]
mod tests {
    pub use super::*;

    #[test]
    fn test_batch_append() {
        let mut batch = Batch::new(3);

        assert!(batch.is_empty());
        assert!(!batch.append(1));
        assert!(!batch.append(2));
        assert_eq!(batch.len(), 2);
        assert!(batch.append(3)); // max_size
        assert!(batch.is_full());
        assert_eq!(batch.split_off(), [1, 2, 3]);
    }

    #[test]
    fn test_batch_split_off() {
        let mut batch = Batch::new(2);

        batch.append(1);
        batch.append(2);
        assert_eq!(batch.split_off(), [1, 2]);
        assert!(batch.is_empty());

        batch.append(3);
        assert_eq!(batch.split_off(), [3]);
    }

    #[test]
    #[should_panic(expected = "Batch append on full batch")]
    fn test_batch_append_full() {
        let mut batch = Batch::new(1);

        batch.append(1);
        batch.append(2);
    }

    #[test]
    #[should_panic(expected = "Batch::new bad max_size")]
    fn test_batch_zero_size() {
        Batch::<u8>::new(0);
    }
}
