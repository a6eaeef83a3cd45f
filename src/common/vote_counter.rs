use alloc::vec::Vec;

use super::history::BoundedHistory;

/// Counts occurrences of keys. Keys whose count drops to zero are removed.
///
/// Entries live in a flat list, so lookups are linear. Recording a key only
/// allocates when the number of distinct keys exceeds the capacity.
#[derive(Clone, Debug, Default)]
pub struct VoteCounter<K> {
    counts: Vec<(K, u32)>,
}

impl<K: Copy + PartialEq + Default> VoteCounter<K> {
    pub fn new() -> Self {
        VoteCounter { counts: Vec::new() }
    }

    /// Creates a counter with room for `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        VoteCounter {
            counts: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, key: K) -> Option<usize> {
        self.counts.iter().position(|(existing, _)| *existing == key)
    }

    /// Records one occurrence of `key` and returns its new count.
    pub fn increment(&mut self, key: K) -> u32 {
        match self.position(key) {
            Some(index) => {
                let count = &mut self.counts[index].1;
                *count += 1;
                *count
            }
            None => {
                self.counts.push((key, 1));
                1
            }
        }
    }

    /// Removes one occurrence of `key` and returns its new count.
    /// Unknown keys are ignored.
    pub fn decrement(&mut self, key: K) -> u32 {
        match self.position(key) {
            Some(index) => {
                let count = &mut self.counts[index].1;
                *count -= 1;
                let remaining = *count;
                if remaining == 0 {
                    self.counts.swap_remove(index);
                }
                remaining
            }
            None => 0,
        }
    }

    pub fn count(&self, key: K) -> u32 {
        self.position(key)
            .map(|index| self.counts[index].1)
            .unwrap_or(0)
    }

    /// The sum of all counts.
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The number of distinct keys that fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.counts.capacity()
    }

    /// Keys and counts in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &u32)> {
        self.counts.iter().map(|(key, count)| (key, count))
    }

    pub fn clear(&mut self) {
        self.counts.clear()
    }

    /// A key with the highest count, or `K::default()` if there are no keys.
    /// Which key wins a tie is unspecified.
    pub fn max_key(&self) -> K {
        let mut max = 0;
        let mut output = K::default();
        for (key, count) in self.counts.iter() {
            if *count > max {
                max = *count;
                output = *key;
            }
        }
        output
    }
}

/// A [`VoteCounter`] that only counts the most recent `interval_size`
/// increments. Its [`max_key`](ModeCounter::max_key) is the mode of the
/// recent keys.
#[derive(Clone, Debug)]
pub struct ModeCounter<K> {
    counter: VoteCounter<K>,
    recent: BoundedHistory<K>,
}

impl<K: Copy + PartialEq + Default> ModeCounter<K> {
    /// Creates a counter for the `interval_size` most recent keys. Recording
    /// keys never allocates unless the interval size is raised later.
    pub fn new(interval_size: usize) -> Self {
        ModeCounter {
            // One extra slot, the newest key is counted before the oldest is evicted.
            counter: VoteCounter::with_capacity(interval_size + 1),
            recent: BoundedHistory::new(interval_size),
        }
    }

    /// Records one occurrence of `key`, forgetting the oldest key once
    /// more than `interval_size` keys have been recorded.
    /// Returns the count of `key` before any eviction.
    pub fn increment(&mut self, key: K) -> u32 {
        let output = self.counter.increment(key);
        let counter = &mut self.counter;
        self.recent.push_evicting(key, |evicted| {
            counter.decrement(evicted);
        });
        output
    }

    pub fn max_key(&self) -> K {
        self.counter.max_key()
    }

    pub fn count(&self, key: K) -> u32 {
        self.counter.count(key)
    }

    pub fn total(&self) -> u32 {
        self.counter.total()
    }

    pub fn is_empty(&self) -> bool {
        self.counter.is_empty()
    }

    pub fn counts(&self) -> &VoteCounter<K> {
        &self.counter
    }

    pub fn interval_size(&self) -> usize {
        self.recent.capacity()
    }

    /// Takes effect on the next increment. Growing the interval allocates.
    pub fn set_interval_size(&mut self, interval_size: usize) {
        self.recent.set_capacity(interval_size);
        let required = interval_size + 1;
        if required > self.counter.counts.capacity() {
            self.counter
                .counts
                .reserve(required - self.counter.counts.len());
        }
    }

    pub fn clear(&mut self) {
        self.counter.clear();
        self.recent.clear();
    }
}
