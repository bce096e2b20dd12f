//! Struct and implementation of the storage node placed on the ring.

use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone)]
/// A storage node identity, placed on the ring by hashing its `host`.
///
/// Cheap to clone, and compared by `host` only: two nodes with the same host
/// are the same node regardless of their display name.
pub struct StorageNode(pub(crate) Arc<NodeInner>);

pub(crate) struct NodeInner {
    pub(crate) name: String,
    pub(crate) host: String,
}

impl StorageNode {
    /// Creates a new node from a display name and a unique host identifier.
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> StorageNode {
        StorageNode(Arc::new(NodeInner {
            name: name.into(),
            host: host.into(),
        }))
    }

    // === Getters ===

    /// Human readable name, not used for placement.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Unique identifier hashed to place this node on the ring.
    pub fn host(&self) -> &str {
        &self.0.host
    }
}

impl PartialEq for StorageNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.host == other.0.host
    }
}

impl Eq for StorageNode {}

impl Hash for StorageNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.host.hash(state)
    }
}

impl Display for StorageNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.0.name, self.0.host)
    }
}

impl Debug for StorageNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageNode")
            .field("name", &self.0.name)
            .field("host", &self.0.host)
            .finish()
    }
}
