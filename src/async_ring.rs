//! AsyncRingHandle.

use crate::common::StorageNode;
use crate::handle::{ActorMessage, RingHandle};
use crate::ring::{Migration, Ring};
use crate::HandleError;

impl RingHandle {
    /// Return an async version of the ring handle.
    pub fn as_async(self) -> AsyncRingHandle {
        AsyncRingHandle(self)
    }
}

#[derive(Debug, Clone)]
/// Async version of the [RingHandle].
pub struct AsyncRingHandle(RingHandle);

impl AsyncRingHandle {
    // === Getters ===

    /// Number of nodes on the ring.
    pub async fn len(&self) -> Result<usize, HandleError> {
        self.request(ActorMessage::Len).await
    }

    /// Returns `true` if no node is on the ring.
    pub async fn is_empty(&self) -> Result<bool, HandleError> {
        Ok(self.len().await? == 0)
    }

    /// A copy of the ring as it is now.
    pub async fn snapshot(&self) -> Result<Ring, HandleError> {
        self.request(ActorMessage::Snapshot).await
    }

    /// Return the blocking version of this handle.
    pub fn as_blocking(&self) -> &RingHandle {
        &self.0
    }

    // === Public Methods ===

    /// See [Ring::add_node].
    pub async fn add_node(&self, node: StorageNode) -> Result<u64, HandleError> {
        Ok(self.add_node_with_migration(node).await?.position)
    }

    /// See [Ring::add_node_with_migration].
    pub async fn add_node_with_migration(
        &self,
        node: StorageNode,
    ) -> Result<Migration, HandleError> {
        Ok(self
            .request(|sender| ActorMessage::AddNode(node, sender))
            .await??)
    }

    /// See [Ring::remove_node].
    pub async fn remove_node(&self, node: &StorageNode) -> Result<u64, HandleError> {
        Ok(self.remove_node_with_migration(node).await?.position)
    }

    /// See [Ring::remove_node_with_migration].
    pub async fn remove_node_with_migration(
        &self,
        node: &StorageNode,
    ) -> Result<Migration, HandleError> {
        let node = node.clone();

        Ok(self
            .request(|sender| ActorMessage::RemoveNode(node, sender))
            .await??)
    }

    /// See [Ring::assign].
    pub async fn assign(&self, key: &str) -> Result<StorageNode, HandleError> {
        let key = key.to_string();

        Ok(self
            .request(|sender| ActorMessage::Assign(key, sender))
            .await??)
    }

    /// Shutdown the actor thread loop.
    pub async fn shutdown(&mut self) {
        let (sender, receiver) = flume::bounded::<()>(1);

        let _ = self.0 .0.send(ActorMessage::Shutdown(sender));
        let _ = receiver.recv_async().await;
    }

    // === Private Methods ===

    async fn request<T>(
        &self,
        message: impl FnOnce(flume::Sender<T>) -> ActorMessage,
    ) -> Result<T, HandleError> {
        let (sender, receiver) = flume::bounded::<T>(1);

        self.0
             .0
            .send_async(message(sender))
            .await
            .map_err(|_| HandleError::Shutdown)?;

        receiver.recv_async().await.map_err(|_| HandleError::Shutdown)
    }
}
