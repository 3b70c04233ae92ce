//! The store actor: one task owns the key-value medium, every page talks to
//! it through a cloneable [`StoreClient`].
//!
//! Each request is handled to completion before the next one is received, so
//! a single `get`, `set`, `delete` or `compare_and_set` is atomic. Nothing
//! groups two requests together: a `get` followed by a `set` from one client
//! can interleave with another client's writes.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::backends::KeyValueStore;
use crate::error::StoreError;

// =============================================================================
// 1. MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest {
    Get {
        key: String,
        respond_to: Response<Option<String>>,
    },
    Set {
        key: String,
        value: String,
        respond_to: Response<()>,
    },
    Delete {
        key: String,
        respond_to: Response<()>,
    },
    /// Writes `value` only if the current text equals `expected`
    /// (`None` meaning the key is absent). Responds with whether it wrote.
    CompareAndSet {
        key: String,
        expected: Option<String>,
        value: String,
        respond_to: Response<bool>,
    },
    Shutdown,
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

pub struct StoreActor<S: KeyValueStore> {
    receiver: mpsc::Receiver<StoreRequest>,
    backend: S,
}

impl<S: KeyValueStore> StoreActor<S> {
    pub fn new(buffer_size: usize, backend: S) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, backend };
        (actor, StoreClient::new(sender))
    }

    /// Runs until `Shutdown` arrives or every client has been dropped.
    #[instrument(name = "store_actor", skip(self))]
    pub async fn run(mut self) {
        info!("StoreActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Get { key, respond_to } => {
                    self.handle_get(key, respond_to);
                }
                StoreRequest::Set { key, value, respond_to } => {
                    self.handle_set(key, value, respond_to);
                }
                StoreRequest::Delete { key, respond_to } => {
                    self.handle_delete(key, respond_to);
                }
                StoreRequest::CompareAndSet {
                    key,
                    expected,
                    value,
                    respond_to,
                } => {
                    self.handle_compare_and_set(key, expected, value, respond_to);
                }
                StoreRequest::Shutdown => {
                    info!("StoreActor shutting down");
                    break;
                }
            }
        }

        info!("StoreActor stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_get(&self, key: String, respond_to: Response<Option<String>>) {
        debug!("Processing get request");
        let result = self.backend.get(&key);
        if let Err(e) = &result {
            error!(error = %e, "Read failed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(bytes = value.len()), skip(self, value, respond_to))]
    fn handle_set(&mut self, key: String, value: String, respond_to: Response<()>) {
        debug!("Processing set request");
        let result = self.backend.set(&key, &value);
        if let Err(e) = &result {
            error!(error = %e, "Write failed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_delete(&mut self, key: String, respond_to: Response<()>) {
        debug!("Processing delete request");
        let result = self.backend.delete(&key);
        if let Err(e) = &result {
            error!(error = %e, "Delete failed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(bytes = value.len()), skip(self, expected, value, respond_to))]
    fn handle_compare_and_set(
        &mut self,
        key: String,
        expected: Option<String>,
        value: String,
        respond_to: Response<bool>,
    ) {
        debug!("Processing compare_and_set request");
        let result = self.backend.get(&key).and_then(|current| {
            if current == expected {
                self.backend.set(&key, &value).map(|()| true)
            } else {
                warn!("Stored value changed since it was read");
                Ok(false)
            }
        });
        let _ = respond_to.send(result);
    }
}

// =============================================================================
// 3. THE CLIENT
// =============================================================================

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
/// Parameters listed in `skip(..)` are kept out of the span (stored values can
/// carry passwords).
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident $(, skip($($skip:ident),*))?) => {
        impl $client {
            #[instrument(skip(self $($(, $skip)*)?))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, StoreError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| StoreError::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| StoreError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to the store actor. Each clone behaves like another page of the
/// same origin.
#[derive(Clone, Debug)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        debug!("Sending shutdown request");
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|_| StoreError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(StoreClient => fn get(key: String) -> Option<String> as StoreRequest::Get);
client_method!(StoreClient => fn set(key: String, value: String) -> () as StoreRequest::Set, skip(value));
client_method!(StoreClient => fn delete(key: String) -> () as StoreRequest::Delete);
client_method!(StoreClient => fn compare_and_set(key: String, expected: Option<String>, value: String) -> bool as StoreRequest::CompareAndSet, skip(expected, value));
