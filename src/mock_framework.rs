//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client, the receiving end of its
//! mailbox, and the sender that feeds its subscriptions. Then use helpers like
//! [`expect_create`] or [`expect_action`] to assert behavior.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::actor_framework::{
    Entity, FrameworkError, InsertOutcome, ResourceClient, ResourceRequest, Snapshot,
};

pub type MockMailbox<T> = mpsc::Receiver<ResourceRequest<T>>;
pub type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a mock client plus the handles that stand in for the actor.
///
/// Requests arrive on the returned receiver instead of a running
/// `ResourceActor`, so a test can inspect each one and answer it (success,
/// failure, delay) deterministically. Snapshots pushed through the returned
/// `watch::Sender` reach the client's subscriptions.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, MockMailbox<T>, watch::Sender<Snapshot<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (snapshots, snapshot_rx) = watch::channel(Arc::new(Vec::new()));
    (ResourceClient::new(sender, snapshot_rx), receiver, snapshots)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut MockMailbox<T>,
) -> Option<(T::CreateParams, Responder<InsertOutcome<T::Id>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut MockMailbox<T>,
) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Replace request
pub async fn expect_replace<T: Entity>(receiver: &mut MockMailbox<T>) -> Option<(T, Responder<bool>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Replace { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut MockMailbox<T>,
) -> Option<(T::Id, Responder<bool>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut MockMailbox<T>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ItemClient;
    use crate::domain::{Item, ItemId, NewItem};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver, _snapshots) = create_mock_client::<Item>(10);
        let client = ItemClient::new(inner);

        let create_task = tokio::spawn(async move {
            client.insert_item(NewItem::new("Test", 1.0, 2)).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "Test");
        responder.send(Ok(InsertOutcome::Inserted(ItemId::new(1)))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(InsertOutcome::Inserted(ItemId::new(1))));
    }

    #[tokio::test]
    async fn test_mock_get_and_snapshots() {
        let (inner, mut receiver, snapshots) = create_mock_client::<Item>(10);
        let client = ItemClient::new(inner);
        let mut observed = client.observe_items();
        assert!(observed.next().await.unwrap().is_empty());

        let get_task = tokio::spawn(async move { client.get_item(ItemId::new(3)).await });
        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, ItemId::new(3));
        responder.send(Ok(None)).unwrap();
        assert_eq!(get_task.await.unwrap(), Ok(None));

        snapshots.send_replace(Arc::new(vec![Item::new(ItemId::new(3), "Pushed", 1.0, 1)]));
        assert_eq!(observed.next().await.unwrap()[0].name, "Pushed");
    }
}
