use std::fmt::{self, Debug, Display};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for ids derived from stored content.
const DERIVED_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5f1c_2a4e_8d3b_4c07_9e61_a0b2_c3d4_e5f6);

/// Stable identity of a record, independent of its position in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// A fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// A name-based (v5) identifier: the same `name` always yields the same id.
    pub fn derive(name: &str) -> Self {
        Self(Uuid::new_v5(&DERIVED_ID_NAMESPACE, name.as_bytes()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything stored as an element of a collection.
///
/// Records travel as JSON. Decoding enforces field presence and types; the
/// [`Record::validate`] hook covers the rules serde cannot express and runs
/// on every load and every write.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Partial update: every provided field overwrites, every absent one is kept.
    type Patch: Send + Debug;

    fn id(&self) -> &RecordId;

    /// Shallow-merges `patch` into `self`.
    fn apply_patch(&mut self, patch: Self::Patch);

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
