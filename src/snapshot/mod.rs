//! Point-in-time CSV export of account state, and verbatim read-back

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::AccountStore;
use crate::types::*;

/// Header row of every account snapshot.
pub const SNAPSHOT_HEADER: [&str; 4] = ["ID", "NAME", "AMOUNT", "USER_ID"];

/// Writes and reads durable account snapshots under a fixed directory.
///
/// A snapshot is a derived, immutable view: one header row, then one
/// comma-separated row per account (`ID,NAME,AMOUNT,USER_ID`), numeric
/// fields unquoted. Account names are written unescaped, so a name
/// containing a comma produces a row downstream CSV parsers will misread;
/// the format is kept for compatibility with existing consumers.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a snapshot store rooted at `dir`. The directory must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn destination(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Export every account to `name`, fully replacing any prior export.
    ///
    /// Rows are sorted by account id so repeated exports of the same state
    /// are byte-identical. The file is written to a temporary sibling and
    /// renamed into place, so readers never observe a half-written export.
    pub async fn export<S: AccountStore>(&self, store: &S, name: &str) -> LedgerResult<PathBuf> {
        let mut accounts = store.list_accounts().await?;
        accounts.sort_by_key(|a| a.id);

        let destination = self.destination(name);
        let staging = staging_path(&destination);
        let file = fs::File::create(&staging).map_err(LedgerError::SnapshotWrite)?;

        // QuoteStyle::Never reproduces the unescaped legacy format.
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(file);
        writer
            .write_record(SNAPSHOT_HEADER)
            .map_err(|e| LedgerError::SnapshotWrite(std::io::Error::other(e)))?;
        for account in &accounts {
            writer
                .write_record([
                    account.id.to_string(),
                    account.name.clone(),
                    account.balance.to_string(),
                    account.owner_id.to_string(),
                ])
                .map_err(|e| LedgerError::SnapshotWrite(std::io::Error::other(e)))?;
        }
        writer.flush().map_err(LedgerError::SnapshotWrite)?;
        drop(writer);

        fs::rename(&staging, &destination).map_err(LedgerError::SnapshotWrite)?;

        debug!(
            "exported {} accounts to {}",
            accounts.len(),
            destination.display()
        );
        Ok(destination)
    }

    /// Read a previously exported snapshot back verbatim.
    ///
    /// This is a raw read-back for inspection, not a restore: the account
    /// store is never repopulated from a snapshot.
    pub async fn import(&self, name: &str) -> LedgerResult<String> {
        let destination = self.destination(name);
        fs::read_to_string(&destination).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LedgerError::SnapshotNotFound(destination.display().to_string())
            } else {
                LedgerError::SnapshotRead(e)
            }
        })
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut staging = destination.as_os_str().to_os_string();
    staging.push(".tmp");
    PathBuf::from(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryStore;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn export_is_bit_exact() {
        let store = MemoryStore::new();
        let user = store.create_user("Valentin", "valentin@example.com").await.unwrap();
        store
            .create_account("Checking", BigDecimal::from(2000), user.id)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let snapshots = SnapshotStore::new(dir.path());

        snapshots.export(&store, "accounts.csv").await.unwrap();
        let content = snapshots.import("accounts.csv").await.unwrap();
        assert_eq!(content, "ID,NAME,AMOUNT,USER_ID\n1,Checking,2000,1\n");
    }

    #[tokio::test]
    async fn export_replaces_prior_snapshot() {
        let store = MemoryStore::new();
        let user = store.create_user("Val", "val@example.com").await.unwrap();
        store
            .create_account("A", BigDecimal::from(10), user.id)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let snapshots = SnapshotStore::new(dir.path());
        snapshots.export(&store, "accounts.csv").await.unwrap();

        store
            .create_account("B", BigDecimal::from(20), user.id)
            .await
            .unwrap();
        snapshots.export(&store, "accounts.csv").await.unwrap();

        let content = snapshots.import("accounts.csv").await.unwrap();
        assert_eq!(content, "ID,NAME,AMOUNT,USER_ID\n1,A,10,1\n2,B,20,1\n");
    }

    #[tokio::test]
    async fn names_are_written_unescaped() {
        let store = MemoryStore::new();
        let user = store.create_user("Val", "val@example.com").await.unwrap();
        store
            .create_account("Rainy, day fund", BigDecimal::from(5), user.id)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let snapshots = SnapshotStore::new(dir.path());
        snapshots.export(&store, "accounts.csv").await.unwrap();

        let content = snapshots.import("accounts.csv").await.unwrap();
        assert_eq!(content, "ID,NAME,AMOUNT,USER_ID\n1,Rainy, day fund,5,1\n");
    }

    #[tokio::test]
    async fn missing_snapshot_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = SnapshotStore::new(dir.path());
        let err = snapshots.import("absent.csv").await.unwrap_err();
        assert!(matches!(err, LedgerError::SnapshotNotFound(_)));
    }

    #[tokio::test]
    async fn unwritable_destination_surfaces_write_error() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-subdir");
        let snapshots = SnapshotStore::new(missing);

        let err = snapshots.export(&store, "accounts.csv").await.unwrap_err();
        assert!(matches!(err, LedgerError::SnapshotWrite(_)));
    }
}
