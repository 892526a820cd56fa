//! Pins and the caller-owned pin allocator.
//!
//! A pin is a port carrying one complex field amplitude. Pin ids are handed
//! out by a [`PinAllocator`] that the caller owns and passes into circuit
//! construction; deleted ids are recycled in FIFO order before the counter
//! advances, so ids stay small and contiguous across rebuilds.

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Unique identifier of a live pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinId(pub(crate) u32);

impl PinId {
    /// Create a PinId from a raw value.
    pub fn new(id: u32) -> Self {
        PinId(id)
    }

    /// Get the raw id value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Get the raw id as an index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin {}", self.0)
    }
}

/// A pin record: id plus optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    id: PinId,
    label: Option<String>,
}

impl Pin {
    /// Get the pin's id.
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Get the pin's label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Allocates pin ids, recycling deleted ones.
#[derive(Debug, Default)]
pub struct PinAllocator {
    /// Next never-used id.
    next_id: u32,
    /// Deleted ids waiting for reuse, oldest first.
    free: VecDeque<PinId>,
    /// Live pins in allocation order, with their labels.
    live: IndexMap<PinId, Option<String>>,
}

impl PinAllocator {
    /// Create an empty allocator; the first pin gets id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an unlabeled pin.
    pub fn allocate(&mut self) -> PinId {
        self.insert(None)
    }

    /// Allocate a pin with a label.
    pub fn allocate_labeled(&mut self, label: impl Into<String>) -> PinId {
        self.insert(Some(label.into()))
    }

    /// Allocate `count` unlabeled pins.
    pub fn allocate_n(&mut self, count: usize) -> Vec<PinId> {
        (0..count).map(|_| self.allocate()).collect()
    }

    fn insert(&mut self, label: Option<String>) -> PinId {
        let id = match self.free.pop_front() {
            Some(id) => id,
            None => {
                let id = PinId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        self.live.insert(id, label);
        id
    }

    /// Delete a live pin, returning its id to the free list.
    ///
    /// Deleting a pin that is not live is rejected.
    pub fn delete(&mut self, id: PinId) -> Result<()> {
        if self.live.shift_remove(&id).is_none() {
            return Err(Error::PinNotLive(id));
        }
        self.free.push_back(id);
        Ok(())
    }

    /// Forget every pin and restart numbering at 0.
    pub fn reset(&mut self) {
        self.next_id = 0;
        self.free.clear();
        self.live.clear();
    }

    /// Number of live pins.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Check whether a pin is live.
    pub fn is_live(&self, id: PinId) -> bool {
        self.live.contains_key(&id)
    }

    /// Look up a live pin.
    pub fn pin(&self, id: PinId) -> Option<Pin> {
        self.live.get(&id).map(|label| Pin {
            id,
            label: label.clone(),
        })
    }

    /// Iterate over live pins in allocation order.
    pub fn pins(&self) -> impl Iterator<Item = Pin> + '_ {
        self.live.iter().map(|(&id, label)| Pin {
            id,
            label: label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut alloc = PinAllocator::new();
        let ids = alloc.allocate_n(3);
        assert_eq!(ids, vec![PinId(0), PinId(1), PinId(2)]);
        assert_eq!(alloc.live_count(), 3);
    }

    #[test]
    fn test_deleted_id_is_reused() {
        let mut alloc = PinAllocator::new();
        let ids = alloc.allocate_n(3);
        alloc.delete(ids[1]).unwrap();
        assert_eq!(alloc.live_count(), 2);

        let reused = alloc.allocate();
        assert_eq!(reused, ids[1]);
        assert_eq!(alloc.allocate(), PinId(3));
    }

    #[test]
    fn test_free_list_is_fifo() {
        let mut alloc = PinAllocator::new();
        let ids = alloc.allocate_n(4);
        alloc.delete(ids[2]).unwrap();
        alloc.delete(ids[0]).unwrap();

        assert_eq!(alloc.allocate(), ids[2]);
        assert_eq!(alloc.allocate(), ids[0]);
    }

    #[test]
    fn test_double_delete_rejected() {
        let mut alloc = PinAllocator::new();
        let id = alloc.allocate();
        alloc.delete(id).unwrap();
        assert!(matches!(alloc.delete(id), Err(Error::PinNotLive(_))));
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn test_reset_restarts_at_zero() {
        let mut alloc = PinAllocator::new();
        let ids = alloc.allocate_n(5);
        alloc.delete(ids[3]).unwrap();
        alloc.reset();

        assert_eq!(alloc.live_count(), 0);
        assert_eq!(alloc.allocate(), PinId(0));
        assert_eq!(alloc.allocate(), PinId(1));
    }

    #[test]
    fn test_labels() {
        let mut alloc = PinAllocator::new();
        let input = alloc.allocate_labeled("input");
        let plain = alloc.allocate();

        assert_eq!(alloc.pin(input).unwrap().label(), Some("input"));
        assert_eq!(alloc.pin(plain).unwrap().label(), None);
        assert_eq!(PinId(7).to_string(), "Pin 7");
    }
}
