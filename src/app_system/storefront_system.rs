use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::actor_framework::{StoreActor, StoreClient};
use crate::app_system::StoreConfig;
use crate::backends::{FileStore, KeyValueStore, MemoryStore};
use crate::clients::{CartClient, UserClient};
use crate::collection::{Collections, ConflictPolicy};
use crate::error::StoreError;

/// Owns the store actor and hands out the page clients wired to it.
///
/// Must be started from within a Tokio runtime.
pub struct StorefrontSystem {
    pub user_client: UserClient,
    pub cart_client: CartClient,
    store_client: StoreClient,
    policy: ConflictPolicy,
    handle: JoinHandle<()>,
}

impl StorefrontSystem {
    /// Starts the system on the backend `config` selects.
    #[instrument(name = "storefront_system", skip(config))]
    pub fn start(config: &StoreConfig) -> Result<Self, StoreError> {
        let backend: Box<dyn KeyValueStore> = match &config.store_dir {
            Some(dir) => {
                info!(store_dir = %dir.display(), "Using file store");
                Box::new(FileStore::open(dir)?)
            }
            None => {
                info!("Using in-memory store");
                Box::new(MemoryStore::new())
            }
        };
        Ok(Self::with_backend(config, backend))
    }

    /// Starts the system on an explicit backend.
    pub fn with_backend<S: KeyValueStore>(config: &StoreConfig, backend: S) -> Self {
        info!(policy = %config.conflict_policy, "Starting storefront system");

        let (actor, store_client) = StoreActor::new(config.channel_capacity, backend);
        let handle = tokio::spawn(actor.run());

        let collections = Collections::new(store_client.clone(), config.conflict_policy);
        let user_client = UserClient::new(collections.clone());
        let cart_client = CartClient::new(collections);

        info!("Storefront system started");

        Self {
            user_client,
            cart_client,
            store_client,
            policy: config.conflict_policy,
            handle,
        }
    }

    /// Fresh collection handle on the same store, as another page of the
    /// origin would get.
    pub fn collections(&self) -> Collections {
        Collections::new(self.store_client.clone(), self.policy)
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), StoreError> {
        info!("Shutting down storefront system");

        self.store_client.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Store actor task failed");
            return Err(StoreError::ActorCommunicationError(format!(
                "Store actor task failed: {}",
                e
            )));
        }

        info!("Storefront system shutdown complete");
        Ok(())
    }
}
