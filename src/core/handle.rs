//! Transient in-memory binary handles.
//!
//! Bytes are registered once in a [`BlobRegistry`] and can be resolved through
//! their `blob:<uuid>` reference until revoked. Revocation is tied to ownership:
//! an [`ObjectHandle`] revokes its entry when dropped, so every handle is
//! revoked exactly once, at the point its owner goes away.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use parking_lot::Mutex;
use serde::{Serialize, Serializer};
use tracing::trace;
use uuid::Uuid;

use crate::utils::{ConverterError, ValidationError};

/// Identity of a registered blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(Uuid);

impl HandleId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The reference string handed out to consumers
    pub fn url(&self) -> String {
        format!("blob:{}", self.0)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:{}", self.0)
    }
}

impl FromStr for HandleId {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("blob:").unwrap_or(s);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| ValidationError::Handle(format!("{s}: {e}")).into())
    }
}

impl Serialize for HandleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Shared table of live blobs.
///
/// Cloning is cheap; clones share the same table.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    objects: Arc<Mutex<HashMap<HandleId, Arc<[u8]>>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns the owning handle.
    pub fn create(&self, bytes: impl Into<Arc<[u8]>>) -> ObjectHandle {
        let bytes = bytes.into();
        let id = HandleId::new();
        self.objects.lock().insert(id, Arc::clone(&bytes));
        trace!("Created {} ({} bytes)", id, bytes.len());
        ObjectHandle {
            id,
            bytes,
            registry: self.clone(),
        }
    }

    /// Looks up a live blob by reference.
    pub fn resolve(&self, id: HandleId) -> Option<Arc<[u8]>> {
        self.objects.lock().get(&id).cloned()
    }

    pub fn is_live(&self, id: HandleId) -> bool {
        self.objects.lock().contains_key(&id)
    }

    /// Number of handles created and not yet revoked
    pub fn live_count(&self) -> usize {
        self.objects.lock().len()
    }

    fn revoke(&self, id: HandleId) {
        if self.objects.lock().remove(&id).is_some() {
            trace!("Revoked {}", id);
        }
    }
}

impl fmt::Debug for BlobRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owning reference to a registered blob. Revoked on drop.
pub struct ObjectHandle {
    id: HandleId,
    bytes: Arc<[u8]>,
    registry: BlobRegistry,
}

impl ObjectHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn url(&self) -> String {
        self.id.url()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shares the underlying bytes without registering a new handle.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for ObjectHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("id", &self.id)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for ObjectHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}
