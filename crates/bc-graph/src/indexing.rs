//! Stream lookup for one graph construction.
//!
//! Maps stream ids (case-insensitive) to arena slots so that a tributary can
//! find the stream it diverts from anywhere in the basin without walking the tree.

use std::collections::HashMap;

use bc_core::{StreamId, StreamIdx};

#[derive(Debug, Clone, Default)]
pub struct StreamIndex {
    /// Slots handed out so far, in depth-first order.
    slots: u32,

    /// Reverse lookup. The first stream registered under an id wins.
    by_id: HashMap<StreamId, StreamIdx>,
}

impl StreamIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next stream and return its slot.
    ///
    /// The second return value is `false` when the id was already taken; the
    /// stream still gets a slot but lookups keep resolving to the first one.
    pub fn register(&mut self, id: &StreamId) -> (StreamIdx, bool) {
        let idx = StreamIdx::from_index(self.slots);
        self.slots += 1;
        let fresh = match self.by_id.get(id) {
            Some(_) => false,
            None => {
                self.by_id.insert(id.clone(), idx);
                true
            }
        };
        (idx, fresh)
    }

    pub fn resolve(&self, id: &StreamId) -> Option<StreamIdx> {
        self.by_id.get(id).copied()
    }

    /// Slots in registration (depth-first pre-) order.
    pub fn slots(&self) -> impl Iterator<Item = StreamIdx> {
        (0..self.slots).map(StreamIdx::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve() {
        let mut index = StreamIndex::new();
        let (main, fresh) = index.register(&StreamId::new("Main"));
        assert!(fresh);
        let (creek, _) = index.register(&StreamId::new("Creek"));

        assert_eq!(index.resolve(&StreamId::new("creek")), Some(creek));
        assert_eq!(index.resolve(&StreamId::new("MAIN")), Some(main));
        assert_eq!(index.resolve(&StreamId::new("Other")), None);
        assert_eq!(index.slots().count(), 2);
    }

    #[test]
    fn first_registration_wins() {
        let mut index = StreamIndex::new();
        let (first, _) = index.register(&StreamId::new("Creek"));
        let (second, fresh) = index.register(&StreamId::new("CREEK"));
        assert!(!fresh);
        assert_ne!(first, second);
        assert_eq!(index.resolve(&StreamId::new("creek")), Some(first));
    }

    #[test]
    fn slots_are_contiguous() {
        let mut index = StreamIndex::new();
        for name in ["A", "B", "C"] {
            index.register(&StreamId::new(name));
        }
        let slots: Vec<u32> = index.slots().map(|s| s.index()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }
}
