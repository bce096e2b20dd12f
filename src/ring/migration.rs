//! Advisory description of which keys change owner on membership churn.
//!
//! The ring never moves data. Mutations report a [Migration] naming the arc of
//! key positions that changed owner and the donor and recipient nodes, so an
//! external executor can copy and delete the affected keys.

use std::fmt::{self, Display, Formatter};

use super::Ring;
use crate::common::StorageNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A contiguous, clockwise run of key positions on the ring.
///
/// Covers `start` up to but excluding `end`, wrapping past the highest slot
/// back to zero when `start > end`. An arc with `start == end` covers the
/// whole ring, which is what a sole node owns.
pub struct SlotArc {
    start: u64,
    end: u64,
}

impl SlotArc {
    pub(crate) fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    // === Getters ===

    /// First position inside the arc.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// First position past the arc, clockwise.
    pub fn end(&self) -> u64 {
        self.end
    }

    // === Public Methods ===

    /// Returns `true` if this arc spans the whole modular space.
    pub fn is_full(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this arc passes through slot zero.
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Returns `true` if a key at `position` falls inside this arc.
    pub fn contains(&self, position: u64) -> bool {
        if self.is_full() {
            true
        } else if self.wraps() {
            position >= self.start || position < self.end
        } else {
            (self.start..self.end).contains(&position)
        }
    }

    /// Number of slots covered, given the ring's modulus.
    pub fn len(&self, total_slots: u64) -> u64 {
        if self.is_full() {
            total_slots
        } else if self.wraps() {
            total_slots - self.start + self.end
        } else {
            self.end - self.start
        }
    }
}

impl Display for SlotArc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Keys that must be handed over after a node joined or left the ring.
pub struct Migration {
    /// Position of the node that joined or left.
    pub position: u64,
    /// Key positions whose owner changed.
    pub arc: SlotArc,
    /// Previous owner of the arc, `None` if the ring was empty before.
    pub from: Option<StorageNode>,
    /// New owner of the arc, `None` if the ring is empty after.
    pub to: Option<StorageNode>,
}

impl Migration {
    /// Returns `true` if there is data to transfer, that is both a donor and a recipient.
    pub fn is_transfer(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single key whose owner differs between two ring states.
pub struct KeyMove {
    pub key: String,
    pub from: StorageNode,
    pub to: StorageNode,
}

impl Ring {
    /// Compute which of `keys` change owner between the `old` and `new` ring states.
    ///
    /// Keys that are unassignable in either state (empty ring) produce no move.
    pub fn diff<'a, I>(old: &Ring, new: &Ring, keys: I) -> Vec<KeyMove>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .filter_map(|key| {
                let from = old.assign(key).ok()?;
                let to = new.assign(key).ok()?;

                (from != to).then(|| KeyMove {
                    key: key.to_string(),
                    from: from.clone(),
                    to: to.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arc() {
        let arc = SlotArc::new(10, 20);

        assert!(!arc.is_full());
        assert!(!arc.wraps());
        assert!(arc.contains(10));
        assert!(arc.contains(19));
        assert!(!arc.contains(20));
        assert!(!arc.contains(9));
        assert_eq!(arc.len(100), 10);
        assert_eq!(arc.to_string(), "[10, 20)");
    }

    #[test]
    fn wrapping_arc() {
        let arc = SlotArc::new(90, 5);

        assert!(arc.wraps());
        assert!(arc.contains(90));
        assert!(arc.contains(99));
        assert!(arc.contains(0));
        assert!(arc.contains(4));
        assert!(!arc.contains(5));
        assert!(!arc.contains(50));
        assert_eq!(arc.len(100), 15);
    }

    #[test]
    fn full_arc() {
        let arc = SlotArc::new(42, 42);

        assert!(arc.is_full());
        assert!(arc.contains(0));
        assert!(arc.contains(42));
        assert!(arc.contains(u64::MAX));
        assert_eq!(arc.len(100), 100);
    }

    #[test]
    fn arc_len_near_u64_max() {
        let total_slots = u64::MAX;
        let arc = SlotArc::new(total_slots - 2, 3);

        assert_eq!(arc.len(total_slots), 5);
    }

    #[test]
    fn diff_reports_only_moved_keys() {
        let mut old = Ring::new(1_000_000_000).unwrap();
        old.add_node(StorageNode::new("A", "10.0.0.1")).unwrap();
        old.add_node(StorageNode::new("B", "10.0.0.2")).unwrap();

        let mut new = old.clone();
        let c = StorageNode::new("C", "10.0.0.3");
        new.add_node(c.clone()).unwrap();

        let keys: Vec<String> = (0..2000).map(|i| format!("key-{i}")).collect();
        let moves = Ring::diff(&old, &new, keys.iter().map(String::as_str));

        assert!(!moves.is_empty());
        for m in &moves {
            assert_eq!(m.to, c);
            assert_eq!(old.assign(&m.key).unwrap(), &m.from);
        }

        let moved = moves.len();
        let unchanged = keys
            .iter()
            .filter(|k| old.assign(k).unwrap() == new.assign(k).unwrap())
            .count();
        assert_eq!(moved + unchanged, keys.len());
    }

    #[test]
    fn diff_with_empty_side_is_empty() {
        let empty = Ring::new(1000).unwrap();
        let mut ring = Ring::new(1000).unwrap();
        ring.add_node(StorageNode::new("A", "10.0.0.1")).unwrap();

        assert!(Ring::diff(&empty, &ring, ["a", "b"]).is_empty());
        assert!(Ring::diff(&ring, &empty, ["a", "b"]).is_empty());
    }
}
