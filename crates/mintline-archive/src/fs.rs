use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{ArchiveError, ArchiveResult};
use crate::key::ArchiveKey;
use crate::traits::{TransactionArchive, TransactionPayloads};

const INPUT_FILE: &str = "input";
const OUTPUT_FILE: &str = "output";

/// Filesystem archive: one directory per `(node_id, timestamp)` key,
/// holding the `input` and `output` payload files.
///
/// Payloads are staged into a dot-prefixed temp directory and renamed
/// into place, so a key is only ever observable with both files complete.
pub struct FsArchive {
    root: PathBuf,
}

impl FsArchive {
    /// Open (or create) an archive rooted at the given directory.
    pub fn open(root: &Path) -> ArchiveResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_dir(&self, key: &ArchiveKey) -> PathBuf {
        self.root.join(key.node_id()).join(key.stamp())
    }

    fn write_payload(dir: &Path, name: &str, data: &[u8]) -> ArchiveResult<()> {
        let mut file = File::create(dir.join(name))?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(())
    }
}

impl TransactionArchive for FsArchive {
    fn store(
        &self,
        node_id: &str,
        moment: DateTime<Utc>,
        input: &[u8],
        output: &[u8],
    ) -> ArchiveResult<ArchiveKey> {
        let base = ArchiveKey::from_moment(node_id, moment)?;
        let node_dir = self.root.join(base.node_id());
        fs::create_dir_all(&node_dir)?;

        // First free key: the bare stamp, then numeric suffixes.
        let mut key = base.clone();
        let mut suffix = 0u32;
        while self.key_dir(&key).exists() {
            suffix += 1;
            key = base.with_suffix(suffix);
        }

        let staging = node_dir.join(format!(".tmp-{}", key.stamp()));
        if staging.exists() {
            // Leftover from a crashed store; its contents are unreferenced.
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir(&staging)?;
        Self::write_payload(&staging, INPUT_FILE, input)?;
        Self::write_payload(&staging, OUTPUT_FILE, output)?;
        fs::rename(&staging, self.key_dir(&key))?;

        debug!(key = %key, input_len = input.len(), output_len = output.len(), "archived transaction payloads");
        Ok(key)
    }

    fn load(&self, key: &ArchiveKey) -> ArchiveResult<TransactionPayloads> {
        let dir = self.key_dir(key);
        if !dir.is_dir() {
            return Err(ArchiveError::NotFound(key.to_string()));
        }
        Ok(TransactionPayloads {
            input: fs::read(dir.join(INPUT_FILE))?,
            output: fs::read(dir.join(OUTPUT_FILE))?,
        })
    }

    fn exists(&self, key: &ArchiveKey) -> ArchiveResult<bool> {
        let dir = self.key_dir(key);
        Ok(dir.join(INPUT_FILE).is_file() && dir.join(OUTPUT_FILE).is_file())
    }
}
