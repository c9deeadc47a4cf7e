use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::error::{ArchiveError, ArchiveResult};
use crate::key::ArchiveKey;
use crate::traits::{TransactionArchive, TransactionPayloads};

/// In-memory archive for tests and embedding.
pub struct InMemoryArchive {
    payloads: RwLock<HashMap<String, TransactionPayloads>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self {
            payloads: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.payloads.read().expect("archive lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.read().expect("archive lock poisoned").is_empty()
    }
}

impl Default for InMemoryArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionArchive for InMemoryArchive {
    fn store(
        &self,
        node_id: &str,
        moment: DateTime<Utc>,
        input: &[u8],
        output: &[u8],
    ) -> ArchiveResult<ArchiveKey> {
        let base = ArchiveKey::from_moment(node_id, moment)?;
        let mut map = self.payloads.write().expect("archive lock poisoned");

        let mut key = base.clone();
        let mut suffix = 0u32;
        while map.contains_key(&key.to_string()) {
            suffix += 1;
            key = base.with_suffix(suffix);
        }

        map.insert(
            key.to_string(),
            TransactionPayloads {
                input: input.to_vec(),
                output: output.to_vec(),
            },
        );
        Ok(key)
    }

    fn load(&self, key: &ArchiveKey) -> ArchiveResult<TransactionPayloads> {
        self.payloads
            .read()
            .expect("archive lock poisoned")
            .get(&key.to_string())
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(key.to_string()))
    }

    fn exists(&self, key: &ArchiveKey) -> ArchiveResult<bool> {
        Ok(self
            .payloads
            .read()
            .expect("archive lock poisoned")
            .contains_key(&key.to_string()))
    }
}
