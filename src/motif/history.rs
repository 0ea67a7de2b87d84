//! Bounded per-voice motif history.

use std::collections::VecDeque;

use super::Motif;

/// Maximum motifs remembered per voice.
pub const HISTORY_CAPACITY: usize = 5;

/// FIFO ring of motifs; the oldest is evicted on overflow.
#[derive(Debug, Clone, Default)]
pub struct MotifHistory {
    entries: VecDeque<Motif>,
}

impl MotifHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Push a motif, evicting the oldest if at capacity.
    pub fn push(&mut self, motif: Motif) {
        if self.entries.len() >= HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(motif);
    }

    pub fn get(&self, index: usize) -> Option<&Motif> {
        self.entries.get(index)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Motif> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::MotifCell;
    use crate::voice::Role;

    fn motif(tag: u8) -> Motif {
        Motif::new(
            Role::Snare,
            vec![MotifCell::hit(0), MotifCell::rest(tag)],
        )
        .unwrap()
    }

    #[test]
    fn new_history_is_empty() {
        let h = MotifHistory::new();
        assert!(h.is_empty());
        assert!(h.get(0).is_none());
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut h = MotifHistory::new();
        for i in 1..=12 {
            h.push(motif(i));
            assert!(h.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn sixth_push_evicts_the_first() {
        let mut h = MotifHistory::new();
        let first = motif(1);
        h.push(first.clone());
        for i in 2..=6 {
            h.push(motif(i));
        }
        assert!(h.iter().all(|m| m != &first));
        assert_eq!(h.get(0), Some(&motif(2)));
        assert_eq!(h.get(4), Some(&motif(6)));
    }
}
