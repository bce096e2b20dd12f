//! Main Crate Error

use crate::common::StorageNode;

#[derive(thiserror::Error, Debug)]
/// Slotring crate error enum.
pub enum Error {
    #[error(transparent)]
    /// Transparent [std::io::Error], from spawning the ring actor thread.
    IO(#[from] std::io::Error),

    #[error(transparent)]
    /// Transparent [ConfigError]
    Config(#[from] ConfigError),

    #[error(transparent)]
    /// Transparent [RingError]
    Ring(#[from] RingError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Rejected ring operations.
///
/// A ring operation that returns any of these left the ring exactly as it was.
pub enum RingError {
    /// Every slot of the modular space is already occupied.
    #[error("Ring is full: all {total_slots} slots are occupied")]
    RingFull { total_slots: u64 },

    /// The incoming node hashed onto a slot another node already occupies.
    #[error("Slot collision at position {position}: {incoming} collides with {existing}")]
    SlotCollision {
        position: u64,
        existing: StorageNode,
        incoming: StorageNode,
    },

    /// The node is not on the ring (never added, already removed, or the ring is empty).
    #[error("Node {node} not found at position {position}")]
    NodeNotFound { node: StorageNode, position: u64 },

    /// A key can't be assigned on a ring without nodes.
    #[error("Can not assign key {key:?} on an empty ring")]
    EmptyRing { key: String },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Invalid ring configuration, fatal for the ring being built.
pub enum ConfigError {
    /// The modular space must have at least one slot.
    #[error("total_slots must be greater than zero")]
    ZeroTotalSlots,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors returned by [crate::RingHandle] calls.
pub enum HandleError {
    #[error(transparent)]
    /// The ring rejected the operation.
    Ring(#[from] RingError),

    /// The actor thread owning the ring is gone.
    #[error("Ring actor was shutdown")]
    Shutdown,
}

/// Alias for `Result<T, slotring::Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
