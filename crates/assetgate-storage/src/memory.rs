//! In-memory storage backend.
//!
//! Keeps every blob in a map and records each `put` in call order. Used by
//! tests to observe exactly which keys were written, and for local
//! development without a bucket.

use crate::keys::{join_url, validate_object_key};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

const MEMORY_BASE_URL: &str = "memory://assets";

/// One recorded `put` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRecord {
    pub key: String,
    pub content_type: String,
    pub size_bytes: usize,
}

#[derive(Default)]
struct Inner {
    files: HashMap<String, Bytes>,
    puts: Vec<PutRecord>,
    deletes: Vec<String>,
    /// Puts allowed to succeed before every further put fails.
    fail_after: Option<usize>,
}

/// Memory-backed storage; clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `put` fails.
    pub fn failing() -> Self {
        Self::failing_after(0)
    }

    /// A store that accepts `successes` puts and fails afterwards.
    pub fn failing_after(successes: usize) -> Self {
        let storage = Self::default();
        storage.lock().fail_after = Some(successes);
        storage
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Recorded puts, oldest first.
    pub fn puts(&self) -> Vec<PutRecord> {
        self.lock().puts.clone()
    }

    pub fn put_keys(&self) -> Vec<String> {
        self.lock().puts.iter().map(|p| p.key.clone()).collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.lock().deletes.clone()
    }

    pub fn get(&self, storage_key: &str) -> Option<Bytes> {
        self.lock().files.get(storage_key).cloned()
    }

    pub fn contains(&self, storage_key: &str) -> bool {
        self.lock().files.contains_key(storage_key)
    }

    /// Number of distinct keys currently held.
    pub fn len(&self) -> usize {
        self.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().files.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StoredObject> {
        validate_object_key(storage_key)?;

        let mut inner = self.lock();
        if let Some(limit) = inner.fail_after {
            if inner.puts.len() >= limit {
                tracing::warn!(key = %storage_key, "Memory store rejecting put");
                return Err(StorageError::UploadFailed(format!(
                    "memory store refused {}",
                    storage_key
                )));
            }
        }

        inner.puts.push(PutRecord {
            key: storage_key.to_string(),
            content_type: content_type.to_string(),
            size_bytes: data.len(),
        });
        inner.files.insert(storage_key.to_string(), data);
        drop(inner);

        Ok(StoredObject {
            key: storage_key.to_string(),
            url: self.public_url(storage_key),
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_object_key(storage_key)?;

        let mut inner = self.lock();
        inner.deletes.push(storage_key.to_string());
        inner
            .files
            .remove(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))?;
        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        join_url(MEMORY_BASE_URL, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
