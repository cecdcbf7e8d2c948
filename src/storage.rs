use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::models::BirthdayRecord;

/// Storage write fault, surfaced to whichever routine requested the save
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write birthday file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize birthday records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat-file store for birthday records
///
/// The whole record list lives in one pretty-printed JSON document, read
/// fully into memory and rewritten fully on every mutation. There is no
/// locking: concurrent `append` calls are read-modify-write races where the
/// last full-document write wins.
#[derive(Clone)]
pub struct BirthdayStore {
    path: PathBuf,
}

impl BirthdayStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every stored record
    ///
    /// A missing file reads as an empty list. Unreadable or malformed
    /// content also reads as an empty list, with a warning; corruption is
    /// treated as "no data", never as a caller-visible failure.
    pub async fn load_all(&self) -> Vec<BirthdayRecord> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read birthday file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Birthday file {} does not hold a record list, treating as empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the document with the full given record list
    pub async fn save_all(&self, records: &[BirthdayRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Load, push one record, save
    ///
    /// Not atomic across concurrent callers; see the type-level note.
    pub async fn append(&self, record: BirthdayRecord) -> Result<(), StoreError> {
        let mut records = self.load_all().await;
        records.push(record);
        self.save_all(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(date: &str, user_id: &str) -> BirthdayRecord {
        BirthdayRecord {
            date: date.to_string(),
            user_id: user_id.to_string(),
        }
    }

    fn store_in(dir: &TempDir) -> BirthdayStore {
        BirthdayStore::new(dir.path().join("birthdays.json"))
    }

    #[tokio::test]
    async fn test_load_all_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_all_garbage_content_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("birthdays.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(BirthdayStore::new(&path).load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_all_non_array_content_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("birthdays.json");
        tokio::fs::write(&path, "{}").await.unwrap();
        assert!(BirthdayStore::new(&path).load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let records = vec![record("7 haziran", "111"), record("1 ocak", "222")];

        store.save_all(&records).await.unwrap();
        assert_eq!(store.load_all().await, records);
    }

    #[tokio::test]
    async fn test_save_of_loaded_content_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("birthdays.json");
        let store = BirthdayStore::new(&path);

        store.save_all(&[record("7 haziran", "111")]).await.unwrap();
        let first = tokio::fs::read_to_string(&path).await.unwrap();

        let loaded = store.load_all().await;
        store.save_all(&loaded).await.unwrap();
        let second = tokio::fs::read_to_string(&path).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_append_keeps_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(record("7 haziran", "111")).await.unwrap();
        store.append(record("7 haziran", "111")).await.unwrap();

        let records = store.load_all().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[tokio::test]
    async fn test_saved_document_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("birthdays.json");
        let store = BirthdayStore::new(&path);

        store.save_all(&[record("7 haziran", "111")]).await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();

        assert!(content.contains("\n  {"));
        assert!(content.contains("\"userId\": \"111\""));
    }
}
