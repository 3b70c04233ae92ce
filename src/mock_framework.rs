//! # Mock Framework
//!
//! Utilities for testing the collection layer and the page clients.
//!
//! [`spawn_collections`] runs a real store actor over a given backend.
//! [`create_mock_store`] instead hands back the request receiver, so a test
//! plays the actor itself and asserts the exact `get`/`set`/`delete` traffic
//! with [`expect_get`], [`expect_set`], [`expect_delete`] and
//! [`expect_compare_and_set`].

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{StoreActor, StoreClient, StoreRequest};
use crate::backends::KeyValueStore;
use crate::collection::{Collections, ConflictPolicy};
use crate::error::StoreError;

type Responder<T> = oneshot::Sender<Result<T, StoreError>>;

/// Starts a store actor over `backend` and returns collections bound to it.
pub fn spawn_collections<S: KeyValueStore>(backend: S, policy: ConflictPolicy) -> Collections {
    let (actor, client) = StoreActor::new(16, backend);
    tokio::spawn(actor.run());
    Collections::new(client, policy)
}

/// A store client whose requests land on a receiver the test controls.
pub fn create_mock_store(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<(String, Responder<Option<String>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Set request
pub async fn expect_set(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<(String, String, Responder<()>)> {
    match receiver.recv().await {
        Some(StoreRequest::Set { key, value, respond_to }) => Some((key, value, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete(receiver: &mut mpsc::Receiver<StoreRequest>) -> Option<(String, Responder<()>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a CompareAndSet request
pub async fn expect_compare_and_set(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, Option<String>, String, Responder<bool>)> {
    match receiver.recv().await {
        Some(StoreRequest::CompareAndSet {
            key,
            expected,
            value,
            respond_to,
        }) => Some((key, expected, value, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CartItem;

    #[tokio::test]
    async fn test_append_is_get_then_set_under_last_write_wins() {
        let (client, mut receiver) = create_mock_store(10);
        let collections = Collections::new(client, ConflictPolicy::LastWriteWins);

        let task = tokio::spawn(async move {
            collections
                .append("cart", CartItem::new("Pen", 10.0, "p.png"))
                .await
        });

        let (key, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(key, "cart");
        responder.send(Ok(None)).unwrap();

        let (key, value, responder) = expect_set(&mut receiver).await.expect("Expected Set request");
        assert_eq!(key, "cart");
        assert!(value.starts_with('[') && value.contains(r#""name":"Pen""#));
        responder.send(Ok(())).unwrap();

        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_append_under_reject_stale_detects_interleaved_write() {
        let (client, mut receiver) = create_mock_store(10);
        let collections = Collections::new(client, ConflictPolicy::RejectStale);

        let task = tokio::spawn(async move {
            collections
                .append("cart", CartItem::new("Pen", 10.0, "p.png"))
                .await
        });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        responder.send(Ok(Some("[]".to_string()))).unwrap();

        // Another page wrote in between: the actor reports the mismatch.
        let (key, expected, _, responder) = expect_compare_and_set(&mut receiver)
            .await
            .expect("Expected CompareAndSet request");
        assert_eq!(key, "cart");
        assert_eq!(expected.as_deref(), Some("[]"));
        responder.send(Ok(false)).unwrap();

        let result = task.await.unwrap();
        assert_eq!(result, Err(StoreError::Stale { key: "cart".to_string() }));
    }

    #[tokio::test]
    async fn test_clear_is_a_single_delete() {
        let (client, mut receiver) = create_mock_store(10);
        let collections = Collections::new(client, ConflictPolicy::LastWriteWins);

        let task = tokio::spawn(async move { collections.clear("cart").await });

        let (key, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(key, "cart");
        responder.send(Ok(())).unwrap();

        assert_eq!(task.await.unwrap(), Ok(()));
        assert!(receiver.try_recv().is_err());
    }
}
