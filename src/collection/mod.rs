//! Typed collections on top of the store actor.
//!
//! A collection is an ordered `Vec` of records persisted as one JSON array
//! under a single key. Every mutating operation is a read-modify-write: it
//! reads the array, changes it in memory and writes the whole array back.
//! The write is immediately durable and visible to the next read, but the
//! read and the write are two separate actor requests. Under
//! [`ConflictPolicy::LastWriteWins`] an interleaved write from another client
//! is silently overwritten; under [`ConflictPolicy::RejectStale`] the write is
//! a compare-and-set and the operation fails with [`StoreError::Stale`].

mod policy;
mod record;

pub use policy::ConflictPolicy;
pub use record::{Record, RecordId};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::StoreClient;
use crate::error::{RecordRef, StoreError};

/// Records together with the exact text they were decoded from.
///
/// Index-addressed changes made through a snapshot are refused with
/// [`StoreError::Stale`] when the stored text no longer matches, so an index
/// can never land on a different record than the one the caller saw.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    key: String,
    raw: Option<String>,
    records: Vec<T>,
}

impl<T> Snapshot<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Handle for reading and mutating named collections. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Collections {
    store: StoreClient,
    policy: ConflictPolicy,
}

impl Collections {
    pub fn new(store: StoreClient, policy: ConflictPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns an empty collection for a key that was never written.
    #[instrument(skip(self))]
    pub async fn load<T: Record>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let raw = self.read(key).await?;
        let records = decode(key, raw.as_deref())?;
        debug!(count = records.len(), "Loaded collection");
        Ok(records)
    }

    #[instrument(skip(self))]
    pub async fn snapshot<T: Record>(&self, key: &str) -> Result<Snapshot<T>, StoreError> {
        let raw = self.read(key).await?;
        let records = decode(key, raw.as_deref())?;
        Ok(Snapshot {
            key: key.to_string(),
            raw,
            records,
        })
    }

    /// First record matching `predicate`, scanning in stored order.
    #[instrument(skip(self, predicate))]
    pub async fn find_first<T, P>(&self, key: &str, predicate: P) -> Result<Option<T>, StoreError>
    where
        T: Record,
        P: Fn(&T) -> bool,
    {
        let found = self.load::<T>(key).await?.into_iter().find(|r| predicate(r));
        debug!(found = found.is_some(), "Scanned collection");
        Ok(found)
    }

    // -------------------------------------------------------------------------
    // Whole-collection writes
    // -------------------------------------------------------------------------

    /// Overwrites the collection. Always a blind write.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn save<T: Record>(&self, key: &str, records: &[T]) -> Result<(), StoreError> {
        let text = encode(key, records)?;
        self.store.set(key.to_string(), text).await?;
        info!("Collection saved");
        Ok(())
    }

    /// Deletes the stored value. A later `load` returns an empty collection.
    #[instrument(skip(self))]
    pub async fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(key.to_string()).await?;
        info!("Collection cleared");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Read-modify-write
    // -------------------------------------------------------------------------

    /// Loads the collection, lets `change` edit it and writes it back.
    ///
    /// Nothing is written when `change` fails.
    pub async fn mutate<T, R, F>(&self, key: &str, change: F) -> Result<R, StoreError>
    where
        T: Record,
        R: Send,
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError> + Send,
    {
        let raw = self.read(key).await?;
        let mut records = decode(key, raw.as_deref())?;
        let out = change(&mut records)?;
        let text = encode(key, &records)?;
        self.commit(key, raw, text, false).await?;
        Ok(out)
    }

    #[instrument(skip(self, record))]
    pub async fn append<T: Record>(&self, key: &str, record: T) -> Result<RecordId, StoreError> {
        let id = record.id().clone();
        let count = self
            .mutate(key, |records: &mut Vec<T>| {
                records.push(record);
                Ok(records.len())
            })
            .await?;
        info!(record_id = %id, count, "Record appended");
        Ok(id)
    }

    /// Removes and returns the record at `index`.
    #[instrument(skip(self))]
    pub async fn remove_at<T: Record>(&self, key: &str, index: usize) -> Result<T, StoreError> {
        let removed = self
            .mutate(key, |records: &mut Vec<T>| take_at(key, records, index))
            .await?;
        info!(record_id = %removed.id(), "Record removed");
        Ok(removed)
    }

    /// Merges `patch` into the record at `index` and returns the result.
    #[instrument(skip(self, patch))]
    pub async fn replace_at<T: Record>(
        &self,
        key: &str,
        index: usize,
        patch: T::Patch,
    ) -> Result<T, StoreError> {
        let updated = self
            .mutate(key, |records: &mut Vec<T>| patch_at(key, records, index, patch))
            .await?;
        info!(record_id = %updated.id(), "Record updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove_by_id<T: Record>(&self, key: &str, id: &RecordId) -> Result<T, StoreError> {
        let removed = self
            .mutate(key, |records: &mut Vec<T>| {
                let index = position_of(key, records, id)?;
                Ok(records.remove(index))
            })
            .await?;
        info!("Record removed");
        Ok(removed)
    }

    #[instrument(skip(self, patch))]
    pub async fn replace_by_id<T: Record>(
        &self,
        key: &str,
        id: &RecordId,
        patch: T::Patch,
    ) -> Result<T, StoreError> {
        let updated = self
            .mutate(key, |records: &mut Vec<T>| {
                let index = position_of(key, records, id)?;
                patch_at(key, records, index, patch)
            })
            .await?;
        info!("Record updated");
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Snapshot-checked variants
    // -------------------------------------------------------------------------

    #[instrument(skip(self, snapshot), fields(key = %snapshot.key))]
    pub async fn remove_at_checked<T: Record>(
        &self,
        snapshot: &Snapshot<T>,
        index: usize,
    ) -> Result<T, StoreError> {
        let key = snapshot.key.as_str();
        let mut records = snapshot.records.clone();
        let removed = take_at(key, &mut records, index)?;
        let text = encode(key, &records)?;
        self.commit(key, snapshot.raw.clone(), text, true).await?;
        info!(record_id = %removed.id(), "Record removed");
        Ok(removed)
    }

    #[instrument(skip(self, snapshot, patch), fields(key = %snapshot.key))]
    pub async fn replace_at_checked<T: Record>(
        &self,
        snapshot: &Snapshot<T>,
        index: usize,
        patch: T::Patch,
    ) -> Result<T, StoreError> {
        let key = snapshot.key.as_str();
        let mut records = snapshot.records.clone();
        let updated = patch_at(key, &mut records, index, patch)?;
        let text = encode(key, &records)?;
        self.commit(key, snapshot.raw.clone(), text, true).await?;
        info!(record_id = %updated.id(), "Record updated");
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Single-value keys
    // -------------------------------------------------------------------------

    /// Reads a key holding one record rather than a collection.
    #[instrument(skip(self))]
    pub async fn load_value<T: Record>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.read(key).await? else {
            return Ok(None);
        };
        let value: Option<Value> = serde_json::from_str(&raw).map_err(|e| StoreError::corrupt(key, e))?;
        let Some(mut value) = value else {
            return Ok(None);
        };
        assign_missing_id(key, 0, &mut value);
        let value: T = serde_json::from_value(value).map_err(|e| StoreError::corrupt(key, e))?;
        value.validate().map_err(|reason| StoreError::corrupt(key, reason))?;
        Ok(Some(value))
    }

    #[instrument(skip(self, value))]
    pub async fn save_value<T: Record>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        value.validate().map_err(|reason| invalid(key, reason))?;
        let text = serde_json::to_string(value).map_err(|e| invalid(key, e))?;
        self.store.set(key.to_string(), text).await
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get(key.to_string()).await
    }

    async fn commit(
        &self,
        key: &str,
        read: Option<String>,
        text: String,
        checked: bool,
    ) -> Result<(), StoreError> {
        if checked || self.policy == ConflictPolicy::RejectStale {
            let written = self.store.compare_and_set(key.to_string(), read, text).await?;
            if !written {
                warn!(key, "Refusing to overwrite a concurrent change");
                return Err(StoreError::Stale {
                    key: key.to_string(),
                });
            }
            Ok(())
        } else {
            self.store.set(key.to_string(), text).await
        }
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Validation {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// `null` decodes like a missing key.
fn decode<T: Record>(key: &str, raw: Option<&str>) -> Result<Vec<T>, StoreError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let values: Option<Vec<Value>> = serde_json::from_str(raw).map_err(|e| StoreError::corrupt(key, e))?;
    let values = values.unwrap_or_default();

    let mut records = Vec::with_capacity(values.len());
    for (index, mut value) in values.into_iter().enumerate() {
        assign_missing_id(key, index, &mut value);
        let record: T = serde_json::from_value(value)
            .map_err(|e| StoreError::corrupt(key, format!("record {}: {}", index, e)))?;
        record
            .validate()
            .map_err(|reason| StoreError::corrupt(key, format!("record {}: {}", index, reason)))?;
        records.push(record);
    }
    Ok(records)
}

/// Records written without an `id` get one derived from the key, their
/// position and their content. Decoding the same stored text twice yields the
/// same ids, and the next write persists them.
fn assign_missing_id(key: &str, index: usize, value: &mut Value) {
    let missing = value
        .as_object()
        .is_some_and(|fields| !fields.contains_key("id"));
    if !missing {
        return;
    }

    let id = RecordId::derive(&format!("{}/{}/{}", key, index, value));
    if let Value::Object(fields) = value {
        fields.insert("id".to_string(), Value::String(id.as_str().to_string()));
    }
}

fn encode<T: Record>(key: &str, records: &[T]) -> Result<String, StoreError> {
    for record in records {
        record.validate().map_err(|reason| invalid(key, reason))?;
    }
    serde_json::to_string(records).map_err(|e| invalid(key, e))
}

fn take_at<T>(key: &str, records: &mut Vec<T>, index: usize) -> Result<T, StoreError> {
    if index >= records.len() {
        return Err(StoreError::not_found(key, RecordRef::Index(index)));
    }
    Ok(records.remove(index))
}

fn patch_at<T: Record>(
    key: &str,
    records: &mut [T],
    index: usize,
    patch: T::Patch,
) -> Result<T, StoreError> {
    let record = records
        .get_mut(index)
        .ok_or_else(|| StoreError::not_found(key, RecordRef::Index(index)))?;
    record.apply_patch(patch);
    Ok(record.clone())
}

fn position_of<T: Record>(key: &str, records: &[T], id: &RecordId) -> Result<usize, StoreError> {
    records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| StoreError::not_found(key, RecordRef::Id(id.clone())))
}
