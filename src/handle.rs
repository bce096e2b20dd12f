//! Ring confined to its own actor thread.

use std::thread;

use flume::{Receiver, Sender};
use tracing::debug;

use crate::common::StorageNode;
use crate::ring::{Config, Migration, Ring};
use crate::{HandleError, Result, RingError};

#[derive(Debug, Clone)]
/// Handle to a [Ring] owned by a dedicated thread.
///
/// Every call is a message to that thread, which applies them one at a time,
/// so mutations never interleave with each other or with lookups. Clones
/// share the same ring; the thread exits once every handle is dropped or
/// [RingHandle::shutdown] is called.
pub struct RingHandle(pub(crate) Sender<ActorMessage>);

impl RingHandle {
    /// Build a ring from `config` and spawn the thread owning it.
    pub fn new(config: Config) -> Result<Self> {
        let ring = Ring::with_config(config)?;

        Self::spawn(ring)
    }

    /// Move an existing ring onto its own thread.
    pub fn spawn(ring: Ring) -> Result<Self> {
        let (sender, receiver) = flume::unbounded();

        thread::Builder::new()
            .name("slotring-actor".to_string())
            .spawn(move || run(ring, receiver))?;

        Ok(RingHandle(sender))
    }

    // === Getters ===

    /// Number of nodes on the ring.
    pub fn len(&self) -> Result<usize, HandleError> {
        self.request(ActorMessage::Len)
    }

    /// Returns `true` if no node is on the ring.
    pub fn is_empty(&self) -> Result<bool, HandleError> {
        Ok(self.len()? == 0)
    }

    /// A copy of the ring as it is now.
    pub fn snapshot(&self) -> Result<Ring, HandleError> {
        self.request(ActorMessage::Snapshot)
    }

    // === Public Methods ===

    /// See [Ring::add_node].
    pub fn add_node(&self, node: StorageNode) -> Result<u64, HandleError> {
        Ok(self.add_node_with_migration(node)?.position)
    }

    /// See [Ring::add_node_with_migration].
    pub fn add_node_with_migration(&self, node: StorageNode) -> Result<Migration, HandleError> {
        Ok(self.request(|sender| ActorMessage::AddNode(node, sender))??)
    }

    /// See [Ring::remove_node].
    pub fn remove_node(&self, node: &StorageNode) -> Result<u64, HandleError> {
        Ok(self.remove_node_with_migration(node)?.position)
    }

    /// See [Ring::remove_node_with_migration].
    pub fn remove_node_with_migration(
        &self,
        node: &StorageNode,
    ) -> Result<Migration, HandleError> {
        let node = node.clone();

        Ok(self.request(|sender| ActorMessage::RemoveNode(node, sender))??)
    }

    /// See [Ring::assign].
    pub fn assign(&self, key: &str) -> Result<StorageNode, HandleError> {
        let key = key.to_string();

        Ok(self.request(|sender| ActorMessage::Assign(key, sender))??)
    }

    /// Stop the actor thread, and wait for it to drop the ring.
    ///
    /// Calls on this or any cloned handle return [HandleError::Shutdown] afterwards.
    pub fn shutdown(&self) {
        let (sender, receiver) = flume::bounded::<()>(1);

        let _ = self.0.send(ActorMessage::Shutdown(sender));
        let _ = receiver.recv();
    }

    // === Private Methods ===

    fn request<T>(
        &self,
        message: impl FnOnce(Sender<T>) -> ActorMessage,
    ) -> Result<T, HandleError> {
        let (sender, receiver) = flume::bounded::<T>(1);

        self.0
            .send(message(sender))
            .map_err(|_| HandleError::Shutdown)?;

        receiver.recv().map_err(|_| HandleError::Shutdown)
    }
}

fn run(mut ring: Ring, receiver: Receiver<ActorMessage>) {
    let mut shutdown = None;

    while let Ok(message) = receiver.recv() {
        match message {
            ActorMessage::AddNode(node, sender) => {
                let _ = sender.send(ring.add_node_with_migration(node));
            }
            ActorMessage::RemoveNode(node, sender) => {
                let _ = sender.send(ring.remove_node_with_migration(&node));
            }
            ActorMessage::Assign(key, sender) => {
                let _ = sender.send(ring.assign(&key).cloned());
            }
            ActorMessage::Len(sender) => {
                let _ = sender.send(ring.len());
            }
            ActorMessage::Snapshot(sender) => {
                let _ = sender.send(ring.clone());
            }
            ActorMessage::Shutdown(sender) => {
                shutdown = Some(sender);
                break;
            }
        }
    }

    drop(receiver);
    drop(ring);

    match shutdown {
        Some(sender) => {
            let _ = sender.send(());
            debug!("slotring::RingHandle's actor thread was shutdown.");
        }
        None => {
            // Every handle was dropped.
            debug!("slotring::RingHandle's actor thread was shutdown after Drop.");
        }
    }
}

#[derive(Debug)]
pub(crate) enum ActorMessage {
    AddNode(StorageNode, Sender<Result<Migration, RingError>>),
    RemoveNode(StorageNode, Sender<Result<Migration, RingError>>),
    Assign(String, Sender<Result<StorageNode, RingError>>),
    Len(Sender<usize>),
    Snapshot(Sender<Ring>),
    Shutdown(Sender<()>),
}
