/// Destination of flushed batches.
///
/// Called on the buffer worker thread, one batch at a time, with 1 up to `size` items in
/// the order the worker received them. While `write` runs no other item or request is
/// taken by the worker, so it should not block for long.
pub trait Flusher<T>: Send + 'static {
    fn write(&mut self, items: Vec<T>);
}

impl<T, F> Flusher<T> for F
where
    F: FnMut(Vec<T>) + Send + 'static,
{
    fn write(&mut self, items: Vec<T>) {
        self(items)
    }
}

#[cfg(test)]
mod tests {
    pub use super::*;

    struct Collect(Vec<Vec<u32>>);

    impl Flusher<u32> for Collect {
        fn write(&mut self, items: Vec<u32>) {
            self.0.push(items)
        }
    }

    fn write_all<F: Flusher<u32>>(flusher: &mut F) {
        flusher.write(vec![1, 2]);
        flusher.write(vec![3]);
    }

    #[test]
    fn test_struct_flusher() {
        let mut flusher = Collect(Vec::new());
        write_all(&mut flusher);

        assert_eq!(flusher.0, [vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_closure_flusher() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut flusher = move |items: Vec<u32>| sender.send(items).unwrap();
        write_all(&mut flusher);

        assert_eq!(receiver.try_iter().collect::<Vec<_>>(), [vec![1, 2], vec![3]]);
    }
}
