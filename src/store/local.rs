//! Local file pledge store
//!
//! Persists pledges as JSON lines in a single file on local disk, with the
//! full record set mirrored in memory for reads. For single-instance
//! deployments without a shared database.

use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::{MemoryPledgeStore, PledgeStore};
use crate::pledge::{CanonicalPledge, PledgeId, PublicPledgeView, StoredPledge};
use crate::taxonomy::ProfileType;
use crate::types::{PledgeError, Result};

/// Pledge store backed by an append-only JSON-lines file
pub struct LocalPledgeStore {
    path: PathBuf,
    file: Mutex<File>,
    table: MemoryPledgeStore,
}

/// Append-only log that can be cut back after a failed write
trait AppendLog: Write {
    fn len(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl AppendLog for File {
    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Write one record line in full, or restore the log to its previous length
fn append_record<L: AppendLog>(log: &mut L, line: &[u8]) -> Result<()> {
    let before = log.len()?;
    if let Err(e) = log.write_all(line).and_then(|()| log.flush()) {
        if let Err(rollback) = log.truncate(before) {
            error!(error = %rollback, "Failed to roll back partial pledge record");
        }
        return Err(PledgeError::StoreUnavailable(format!(
            "Failed to append pledge: {}",
            e
        )));
    }
    Ok(())
}

impl LocalPledgeStore {
    /// Open (or create) the store file and load existing records.
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                PledgeError::StoreUnavailable(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(&file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredPledge>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    error = %e,
                    "Skipping unreadable pledge record"
                ),
            }
        }

        info!(
            "LocalPledgeStore opened {} ({} pledges)",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            file: Mutex::new(file),
            table: MemoryPledgeStore::from_records(records),
        })
    }
}

#[async_trait::async_trait]
impl PledgeStore for LocalPledgeStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn insert(&self, pledge: CanonicalPledge) -> Result<PledgeId> {
        // Held across the write and the in-memory append so file order and
        // table order agree
        let mut file = self.file.lock().await;

        let stored = StoredPledge::new(PledgeId::generate(), pledge, Utc::now());
        let mut line = serde_json::to_vec(&stored)
            .map_err(|e| PledgeError::Internal(format!("Failed to encode pledge: {}", e)))?;
        line.push(b'\n');

        append_record(&mut *file, &line)?;

        let id = stored.id.clone();
        self.table.push(stored).await;
        debug!(id = %id, path = %self.path.display(), "Pledge appended to local store");
        Ok(id)
    }

    async fn list(&self, limit: usize) -> Result<Vec<PublicPledgeView>> {
        self.table.list(limit).await
    }

    async fn count_by_profile_type(&self, profile_type: ProfileType) -> Result<u64> {
        self.table.count_by_profile_type(profile_type).await
    }

    async fn total_count(&self) -> Result<u64> {
        self.table.total_count().await
    }
}
