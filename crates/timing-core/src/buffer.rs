//! Fixed-capacity ring of fixes recorded while a crossing is suspected.

use model::Fix;

#[derive(Clone, Debug)]
pub struct CrossingBuffer {
    samples: Vec<Fix>,
    capacity: usize,
    index: usize,
    full: bool,
}

impl CrossingBuffer {
    /// Storage is reserved once here; pushes never grow it past `capacity`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            index: 0,
            full: false,
        }
    }

    /// Write at the current slot, overwriting the oldest fix once wrapped.
    pub fn push(&mut self, fix: Fix) {
        if self.samples.len() < self.capacity {
            self.samples.push(fix);
        } else {
            self.samples[self.index] = fix;
        }
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.full = true;
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.index = 0;
        self.full = false;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Next slot to be written.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn oldest(&self) -> usize {
        if self.full {
            self.index
        } else {
            0
        }
    }

    /// Fix at chronological position `i` (0 = oldest still held).
    pub fn get(&self, i: usize) -> Option<&Fix> {
        if i >= self.samples.len() {
            return None;
        }
        self.samples.get((self.oldest() + i) % self.samples.len())
    }

    /// Valid fixes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Fix> + '_ {
        let (newer, older) = self.samples.split_at(self.oldest());
        older.iter().chain(newer.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(t: u64) -> Fix {
        Fix {
            lat: t as f64,
            lng: 0.0,
            altitude_m: None,
            timestamp_ms: t,
            odometer_m: 0.0,
            speed_kmh: 30.0,
        }
    }

    fn times(b: &CrossingBuffer) -> Vec<u64> {
        b.iter().map(|f| f.timestamp_ms).collect()
    }

    #[test]
    fn test_fills_in_order() {
        let mut b = CrossingBuffer::new(4);
        for t in 0..3 {
            b.push(fix(t));
        }
        assert_eq!(b.len(), 3);
        assert_eq!(b.index(), 3);
        assert!(!b.is_full());
        assert_eq!(times(&b), vec![0, 1, 2]);
    }

    #[test]
    fn test_full_flag_set_on_wrap() {
        let mut b = CrossingBuffer::new(3);
        for t in 0..3 {
            b.push(fix(t));
        }
        assert!(b.is_full());
        assert_eq!(b.index(), 0);
    }

    #[test]
    fn test_wraparound_keeps_newest_in_order() {
        let mut b = CrossingBuffer::new(4);
        for t in 0..6 {
            b.push(fix(t));
        }
        assert_eq!(b.len(), 4);
        assert_eq!(b.capacity(), 4);
        assert_eq!(times(&b), vec![2, 3, 4, 5]);
        assert_eq!(b.get(0).map(|f| f.timestamp_ms), Some(2));
        assert_eq!(b.get(3).map(|f| f.timestamp_ms), Some(5));
        assert!(b.get(4).is_none());
    }

    #[test]
    fn test_clear() {
        let mut b = CrossingBuffer::new(2);
        for t in 0..5 {
            b.push(fix(t));
        }
        b.clear();
        assert!(b.is_empty());
        assert!(!b.is_full());
        assert_eq!(b.index(), 0);
        assert!(b.iter().next().is_none());
    }
}
