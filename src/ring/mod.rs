//! Consistent hashing ring
//!
//! Nodes are placed on a modular space of `total_slots` positions by hashing
//! their host. A key is owned by the first node clockwise whose position is
//! strictly greater than the key's position, wrapping to the lowest node.
//! Adding or removing a node only changes the owner of the keys in the arc
//! between that node and its counter-clockwise neighbour.

pub mod config;
mod migration;

use std::num::NonZeroU64;
use std::slice::Iter;

use tracing::{debug, trace, warn};

use crate::common::{hash_to_slot, StorageNode};
use crate::{ConfigError, Result, RingError};

pub use config::{Config, RingBuilder};
pub use migration::{KeyMove, Migration, SlotArc};

/// Default size of the modular space.
pub const DEFAULT_TOTAL_SLOTS: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A node and the position it occupies on the ring.
pub struct RingEntry {
    position: u64,
    node: StorageNode,
}

impl RingEntry {
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn node(&self) -> &StorageNode {
        &self.node
    }
}

#[derive(Debug, Clone)]
/// Consistent hashing ring with one position per node.
///
/// Mutations take `&mut self` and reads take `&self`, so a shared ring can
/// serve concurrent [Ring::assign] calls while mutations stay exclusive. See
/// [crate::RingHandle] for confining a ring to its own thread instead.
pub struct Ring {
    total_slots: NonZeroU64,
    /// Sorted by position, positions unique.
    entries: Vec<RingEntry>,
}

impl Ring {
    /// Create an empty ring over `total_slots` positions.
    pub fn new(total_slots: u64) -> Result<Self, ConfigError> {
        let total_slots = NonZeroU64::new(total_slots).ok_or(ConfigError::ZeroTotalSlots)?;

        Ok(Ring {
            total_slots,
            entries: Vec::new(),
        })
    }

    /// Create a ring from a [Config], adding its nodes in order.
    pub fn with_config(config: Config) -> Result<Self> {
        let mut ring = Ring::new(config.total_slots)?;

        for node in config.nodes {
            ring.add_node(node)?;
        }

        Ok(ring)
    }

    /// Returns a builder to edit settings before creating a ring.
    pub fn builder() -> RingBuilder {
        RingBuilder::default()
    }

    // === Getters ===

    /// Size of the modular space.
    pub fn total_slots(&self) -> u64 {
        self.total_slots.get()
    }

    /// Number of nodes on the ring.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no node is on the ring.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.entries.len() as u64 >= self.total_slots.get()
    }

    /// Entries in ascending position order.
    pub fn entries(&self) -> Iter<'_, RingEntry> {
        self.entries.iter()
    }

    /// Nodes in ascending position order.
    pub fn nodes(&self) -> impl Iterator<Item = &StorageNode> {
        self.entries.iter().map(|entry| &entry.node)
    }

    /// Position a node hashes to on this ring, whether it was added or not.
    pub fn position_of(&self, node: &StorageNode) -> u64 {
        self.slot(node.host())
    }

    /// Returns `true` if this node is on the ring.
    pub fn contains(&self, node: &StorageNode) -> bool {
        self.find(node).is_some()
    }

    // === Public Methods ===

    /// Place a node on the ring and return its position.
    ///
    /// Fails without modifying the ring if every slot is taken, or if the
    /// node's position is already occupied.
    pub fn add_node(&mut self, node: StorageNode) -> Result<u64, RingError> {
        self.add_node_with_migration(node)
            .map(|migration| migration.position)
    }

    /// Same as [Self::add_node] but returns the [Migration] the addition
    /// requires: keys in the arc ending at the new node move to it from its
    /// clockwise successor.
    pub fn add_node_with_migration(&mut self, node: StorageNode) -> Result<Migration, RingError> {
        if self.is_full() {
            warn!(%node, total_slots = self.total_slots.get(), "Ring is full");

            return Err(RingError::RingFull {
                total_slots: self.total_slots.get(),
            });
        }

        let position = self.slot(node.host());

        let lower = self.lower_bound(position);
        if let Some(existing) = self.entries.get(lower).filter(|e| e.position == position) {
            warn!(position, %node, existing = %existing.node, "Slot collision");

            return Err(RingError::SlotCollision {
                position,
                existing: existing.node.clone(),
                incoming: node,
            });
        }

        // Keys at or past the predecessor, up to the new position, used to
        // resolve to the successor. With no other node there is no donor.
        let migration = match (self.predecessor(position), self.successor(position)) {
            (Some(predecessor), Some(successor)) => Migration {
                position,
                arc: SlotArc::new(predecessor.position, position),
                from: Some(successor.node.clone()),
                to: Some(node.clone()),
            },
            _ => Migration {
                position,
                arc: SlotArc::new(position, position),
                from: None,
                to: Some(node.clone()),
            },
        };

        let index = self.upper_bound(position);
        debug!(position, %node, index, "Added node to ring");
        self.entries.insert(index, RingEntry { position, node });

        Ok(migration)
    }

    /// Remove a node from the ring and return the position it occupied.
    ///
    /// Fails without modifying the ring if the node is not on it.
    pub fn remove_node(&mut self, node: &StorageNode) -> Result<u64, RingError> {
        self.remove_node_with_migration(node)
            .map(|migration| migration.position)
    }

    /// Same as [Self::remove_node] but returns the [Migration] the removal
    /// requires: keys the node owned move to its clockwise successor.
    pub fn remove_node_with_migration(
        &mut self,
        node: &StorageNode,
    ) -> Result<Migration, RingError> {
        let position = self.slot(node.host());

        let index = self.find(node).ok_or_else(|| RingError::NodeNotFound {
            node: node.clone(),
            position,
        })?;

        let removed = self.entries.remove(index);
        debug!(position, node = %removed.node, "Removed node from ring");

        let migration = match (self.predecessor(position), self.successor(position)) {
            (Some(predecessor), Some(successor)) => Migration {
                position,
                arc: SlotArc::new(predecessor.position, position),
                from: Some(removed.node),
                to: Some(successor.node.clone()),
            },
            _ => Migration {
                position,
                arc: SlotArc::new(position, position),
                from: Some(removed.node),
                to: None,
            },
        };

        Ok(migration)
    }

    /// Resolve the node owning `key`.
    ///
    /// The owner is the first node with a position strictly greater than the
    /// key's position, wrapping around to the lowest positioned node.
    pub fn assign(&self, key: &str) -> Result<&StorageNode, RingError> {
        let position = self.slot(key);
        let node = &self
            .successor(position)
            .ok_or_else(|| RingError::EmptyRing {
                key: key.to_string(),
            })?
            .node;

        trace!(key, position, %node, "Assigned key");

        Ok(node)
    }

    /// The arc of key positions `node` currently owns, if it is on the ring.
    pub fn owned_arc(&self, node: &StorageNode) -> Option<SlotArc> {
        let position = self.entries.get(self.find(node)?)?.position;
        let predecessor = self.predecessor(position)?;

        Some(SlotArc::new(predecessor.position, position))
    }

    /// First entry clockwise with a position strictly greater than `position`,
    /// wrapping to the lowest entry. `None` if the ring is empty.
    pub fn successor(&self, position: u64) -> Option<&RingEntry> {
        self.entries
            .get(self.upper_bound(position))
            .or_else(|| self.entries.first())
    }

    /// First entry counter-clockwise with a position strictly less than
    /// `position`, wrapping to the highest entry. `None` if the ring is empty.
    pub fn predecessor(&self, position: u64) -> Option<&RingEntry> {
        match self.lower_bound(position) {
            0 => self.entries.last(),
            index => self.entries.get(index - 1),
        }
    }

    // === Private Methods ===

    fn slot(&self, identifier: &str) -> u64 {
        hash_to_slot(identifier, self.total_slots)
    }

    /// Index of the entry holding exactly this node.
    fn find(&self, node: &StorageNode) -> Option<usize> {
        let position = self.slot(node.host());
        let index = self.lower_bound(position);

        self.entries
            .get(index)
            .filter(|entry| entry.position == position && entry.node == *node)
            .map(|_| index)
    }

    /// First index whose position is `>= position`.
    fn lower_bound(&self, position: u64) -> usize {
        self.entries.partition_point(|entry| entry.position < position)
    }

    /// First index whose position is `> position`.
    fn upper_bound(&self, position: u64) -> usize {
        self.entries.partition_point(|entry| entry.position <= position)
    }
}

impl Default for Ring {
    fn default() -> Self {
        Ring {
            total_slots: NonZeroU64::new(DEFAULT_TOTAL_SLOTS).unwrap_or(NonZeroU64::MIN),
            entries: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Ring {
    type Item = &'a RingEntry;
    type IntoIter = Iter<'a, RingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
