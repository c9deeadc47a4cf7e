use std::fs::{self, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use mintline_types::DoiRecord;
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::latest;
use crate::query::Criteria;
use crate::traits::{Appended, LedgerStore};

/// Frame header: 4 bytes length + 4 bytes CRC32, little-endian.
const HEADER_SIZE: usize = 8;

/// Configuration for the file-backed ledger.
#[derive(Clone, Debug)]
pub struct FileLedgerConfig {
    /// How many times to re-attempt acquiring the append lock.
    pub lock_retries: u32,
    /// Pause between lock attempts.
    pub lock_backoff: Duration,
}

impl Default for FileLedgerConfig {
    fn default() -> Self {
        Self {
            lock_retries: 50,
            lock_backoff: Duration::from_millis(20),
        }
    }
}

struct FileState {
    rows: Vec<DoiRecord>,
    /// Byte offset just past the last structurally complete frame.
    clean_offset: u64,
}

/// Crash-recoverable file-backed ledger.
///
/// Rows are bincode-serialized, framed with a length prefix and a CRC32
/// checksum, and appended to a single log file with an fsync per append —
/// the ledger is authoritative, not a cache. On open (and before every
/// operation) the file is read front-to-back from the last known clean
/// offset; frames that fail the CRC check are skipped and a torn tail
/// stops recovery, so a crashed write never surfaces a partial row.
/// Latest flags are recomputed from replay order, never trusted from disk.
///
/// The ledger is shared by independent processes with no in-process
/// coordination. The append read-modify-write (tail re-sync, flag clear,
/// frame write, fsync) runs under an exclusive advisory lock file; a
/// competing appender blocks with bounded retry and then fails with the
/// retryable [`LedgerError::Busy`]. Readers re-sync the appended tail
/// before serving a query, so staleness cannot produce stale workflow
/// decisions.
pub struct FileLedger {
    path: PathBuf,
    lock_path: PathBuf,
    config: FileLedgerConfig,
    state: Mutex<FileState>,
}

impl FileLedger {
    /// Open (or create) a ledger log at the given path.
    pub fn open(path: &Path, config: FileLedgerConfig) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Ensure the log exists so later opens can use read-only handles.
        OpenOptions::new().create(true).append(true).open(path)?;

        let mut state = FileState {
            rows: Vec::new(),
            clean_offset: 0,
        };
        Self::replay(path, &mut state)?;

        Ok(Self {
            path: path.to_path_buf(),
            lock_path: path.with_extension("lock"),
            config,
            state: Mutex::new(state),
        })
    }

    /// Path to the ledger log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read frames from the clean offset to EOF, integrating each row in
    /// order. Structurally complete frames advance the clean offset even
    /// when their payload is skipped; a torn tail does not.
    fn replay(path: &Path, state: &mut FileState) -> LedgerResult<()> {
        let mut file = BufReader::new(OpenOptions::new().read(true).open(path)?);
        let file_len = file.get_ref().metadata()?.len();
        let mut offset = state.clean_offset;

        while offset + HEADER_SIZE as u64 <= file_len {
            file.seek(SeekFrom::Start(offset))?;

            let mut header = [0u8; HEADER_SIZE];
            match file.read_exact(&mut header) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            if length == 0 || offset + (HEADER_SIZE as u64) + (length as u64) > file_len {
                warn!(offset, length, file_len, "torn ledger frame; stopping replay");
                break;
            }

            let mut payload = vec![0u8; length as usize];
            match file.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    warn!(offset, "truncated ledger frame; stopping replay");
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let frame_size = HEADER_SIZE as u64 + length as u64;
            let actual_crc = crc32fast::hash(&payload);
            if actual_crc != expected_crc {
                warn!(offset, expected = expected_crc, actual = actual_crc, "CRC mismatch; skipping frame");
                offset += frame_size;
                continue;
            }

            match bincode::deserialize::<DoiRecord>(&payload) {
                Ok(row) => {
                    let plan = latest::plan(&state.rows, &row);
                    latest::apply(&mut state.rows, row, plan);
                }
                Err(e) => {
                    warn!(offset, error = %e, "undecodable ledger frame; skipping");
                }
            }

            offset += frame_size;
        }

        if offset > state.clean_offset {
            debug!(
                from = state.clean_offset,
                to = offset,
                rows = state.rows.len(),
                "ledger replay"
            );
        }
        state.clean_offset = offset;
        Ok(())
    }
}

impl LedgerStore for FileLedger {
    fn append(&self, row: DoiRecord) -> LedgerResult<Appended> {
        let _lock = LockGuard::acquire(&self.lock_path, &self.config)?;
        let mut state = self.state.lock().expect("ledger mutex poisoned");

        // Pick up rows other processes appended since our last look.
        Self::replay(&self.path, &mut state)?;

        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let file_len = file.metadata()?.len();
        if file_len > state.clean_offset {
            // We hold the append lock, so trailing bytes past the clean
            // offset are a crashed writer's torn frame. Drop them.
            warn!(
                clean = state.clean_offset,
                file_len, "truncating torn ledger tail"
            );
            file.set_len(state.clean_offset)?;
        }

        let plan = latest::plan(&state.rows, &row);
        let mut framed = row;
        framed.is_latest = plan.new_is_latest;

        let payload =
            bincode::serialize(&framed).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let crc = crc32fast::hash(&payload);

        file.seek(SeekFrom::Start(state.clean_offset))?;
        file.write_all(&(payload.len() as u32).to_le_bytes())?;
        file.write_all(&crc.to_le_bytes())?;
        file.write_all(&payload)?;
        file.sync_all()?;

        let offset = state.clean_offset;
        state.clean_offset += (HEADER_SIZE + payload.len()) as u64;
        let appended = latest::apply(&mut state.rows, framed, plan);

        debug!(offset, seq = appended.seq, identifier = %appended.row.identifier, "ledger append");
        Ok(appended)
    }

    fn query(&self, criteria: &Criteria) -> LedgerResult<Vec<DoiRecord>> {
        let mut state = self.state.lock().expect("ledger mutex poisoned");
        Self::replay(&self.path, &mut state)?;
        Ok(state
            .rows
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect())
    }

    fn row_count(&self) -> LedgerResult<u64> {
        let mut state = self.state.lock().expect("ledger mutex poisoned");
        Self::replay(&self.path, &mut state)?;
        Ok(state.rows.len() as u64)
    }
}

/// Exclusive advisory lock held for the duration of one append.
///
/// Acquisition creates the lock file with `create_new`; the file carries
/// the holder's PID for operators. A lock left behind by a crashed writer
/// surfaces as [`LedgerError::Busy`] after the retry budget and must be
/// removed by hand.
struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    fn acquire(path: &Path, config: &FileLedgerConfig) -> LedgerResult<Self> {
        let mut attempt = 0u32;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    let _ = write!(file, "{}", std::process::id());
                    return Ok(Self {
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if attempt >= config.lock_retries {
                        return Err(LedgerError::Busy(format!(
                            "append lock {} is held by another writer",
                            path.display()
                        )));
                    }
                    attempt += 1;
                    thread::sleep(config.lock_backoff);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release append lock");
        }
    }
}
