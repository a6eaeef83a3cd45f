use alloc::collections::VecDeque;

/// A fixed capacity FIFO of the most recent values. The oldest values are
/// evicted first.
#[derive(Clone, Debug)]
pub struct BoundedHistory<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedHistory {
            data: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a value, then evicts from the front until the
    /// length equals the capacity.
    pub fn push(&mut self, value: T) {
        self.push_evicting(value, |_| {})
    }

    /// Like [`push`](Self::push), passing each evicted value to `on_evict`.
    pub fn push_evicting<F>(&mut self, value: T, mut on_evict: F)
    where
        F: FnMut(T),
    {
        self.data.push_back(value);
        while self.data.len() > self.capacity {
            match self.data.pop_front() {
                Some(evicted) => on_evict(evicted),
                None => break,
            }
        }
    }

    /// The retained values, oldest first.
    pub fn data(&self) -> &VecDeque<T> {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True once `capacity` values have been pushed.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.data.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sets a new capacity. Existing values are kept; any excess is
    /// trimmed by the next push.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }
}

impl BoundedHistory<f32> {
    /// The arithmetic mean of the retained values, or 0 if empty.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.data.iter().sum();
        sum / (self.data.len() as f32)
    }
}
