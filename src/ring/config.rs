use crate::common::StorageNode;
use crate::Result;

use super::{Ring, DEFAULT_TOTAL_SLOTS};

#[derive(Debug, Clone)]
/// Ring Configurations
pub struct Config {
    /// Size of the modular space positions are drawn from.
    ///
    /// Fixed for the lifetime of a ring; resizing means building a new ring
    /// and migrating every key. Must be greater than zero, and bounds the
    /// number of nodes the ring can hold.
    ///
    /// Defaults to [DEFAULT_TOTAL_SLOTS]
    pub total_slots: u64,
    /// Nodes added, in order, when the ring is built.
    ///
    /// Defaults to empty.
    pub nodes: Vec<StorageNode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_slots: DEFAULT_TOTAL_SLOTS,
            nodes: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone)]
/// Builder for [Ring]
pub struct RingBuilder(Config);

impl RingBuilder {
    /// Set the size of the modular space.
    pub fn total_slots(&mut self, total_slots: u64) -> &mut Self {
        self.0.total_slots = total_slots;

        self
    }

    /// Add a node to be placed when the ring is built.
    pub fn node(&mut self, node: StorageNode) -> &mut Self {
        self.0.nodes.push(node);

        self
    }

    /// Replace the initial nodes.
    pub fn nodes(&mut self, nodes: &[StorageNode]) -> &mut Self {
        self.0.nodes = nodes.to_vec();

        self
    }

    /// Return the configuration this builder would build with.
    pub fn config(&self) -> &Config {
        &self.0
    }

    /// Create a [Ring] and place the configured nodes on it.
    pub fn build(&self) -> Result<Ring> {
        Ring::with_config(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConfigError, Error, RingError};

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.total_slots, 1_000_000_000);
        assert!(config.nodes.is_empty());

        let ring = Ring::builder().build().unwrap();
        assert_eq!(ring.total_slots(), DEFAULT_TOTAL_SLOTS);
        assert!(ring.is_empty());
    }

    #[test]
    fn builds_with_nodes() {
        let ring = Ring::builder()
            .total_slots(1_000_000_000)
            .node(StorageNode::new("A", "10.0.0.1"))
            .node(StorageNode::new("B", "10.0.0.2"))
            .build()
            .unwrap();

        assert_eq!(ring.len(), 2);
        assert!(ring.contains(&StorageNode::new("A", "10.0.0.1")));
    }

    #[test]
    fn zero_slots_is_rejected() {
        let result = Ring::builder().total_slots(0).build();

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ZeroTotalSlots))
        ));
    }

    #[test]
    fn first_failing_node_fails_the_build() {
        // node-0 and node-9 both hash to slot 0 of 16.
        let result = Ring::builder()
            .total_slots(16)
            .nodes(&[
                StorageNode::new("n0", "node-0"),
                StorageNode::new("n9", "node-9"),
            ])
            .build();

        assert!(matches!(
            result,
            Err(Error::Ring(RingError::SlotCollision { position: 0, .. }))
        ));
    }
}
