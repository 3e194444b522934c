use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metrics::counter;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::api::IngestError;
use crate::payload::{IngestRecord, RecordKind};
use crate::sinks::RecordSink;
use crate::time::file_stamp;

/// Writes each record as a uniquely named file under the configured
/// directory for its kind. Filenames carry the receipt timestamp plus
/// a random suffix, so concurrent writes never target the same path
/// and nothing is ever overwritten.
pub struct FileSink {
    data_dir: Option<PathBuf>,
    logs_dir: Option<PathBuf>,
}

impl FileSink {
    pub fn new(data_dir: Option<PathBuf>, logs_dir: Option<PathBuf>) -> FileSink {
        FileSink { data_dir, logs_dir }
    }

    /// Directory resolution happens per write: a missing setting is a
    /// configuration error surfaced on the first write attempt, not at
    /// startup.
    fn dir_for(&self, kind: RecordKind) -> Result<&Path, IngestError> {
        let (dir, setting) = match kind {
            RecordKind::Data => (&self.data_dir, "data_folder_path"),
            RecordKind::Log => (&self.logs_dir, "logs_folder_path"),
        };
        dir.as_deref()
            .ok_or(IngestError::MissingStorageDir(setting))
    }

    async fn write(
        &self,
        kind: RecordKind,
        received_at: OffsetDateTime,
        content: String,
    ) -> Result<PathBuf, IngestError> {
        let dir = self.dir_for(kind)?;
        tokio::fs::create_dir_all(dir).await?;

        let file_name = format!(
            "{}_{}_{}.json",
            kind.prefix(),
            file_stamp(received_at),
            Uuid::new_v4().simple()
        );
        let path = dir.join(file_name);
        tokio::fs::write(&path, content).await?;

        counter!("ingest_records_stored_total", "kind" => kind.prefix()).increment(1);
        tracing::info!(path = %path.display(), "payload saved");
        Ok(path)
    }
}

#[async_trait]
impl RecordSink for FileSink {
    async fn store(&self, kind: RecordKind, record: IngestRecord) -> Result<(), IngestError> {
        let content = record.to_envelope_json()?;
        if let Err(err) = self.write(kind, record.received_at, content).await {
            tracing::error!("failed to save {} payload: {}", kind.prefix(), err);
            return Err(err);
        }
        Ok(())
    }

    async fn store_raw(
        &self,
        raw: String,
        received_at: OffsetDateTime,
    ) -> Result<(), IngestError> {
        if let Err(err) = self.write(RecordKind::Data, received_at, raw).await {
            tracing::error!("failed to save raw payload: {}", err);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::FileSink;
    use crate::api::IngestError;
    use crate::payload::{IngestRecord, RecordKind};
    use crate::sinks::RecordSink;

    #[tokio::test]
    async fn filename_carries_stamp_and_random_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(Some(dir.path().to_path_buf()), None);

        let path = sink
            .write(
                RecordKind::Data,
                datetime!(2024-01-31 23:59:59 UTC),
                "{}".to_string(),
            )
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("data_20240131_235959_"));
        assert!(name.ends_with(".json"));

        let suffix = name
            .strip_prefix("data_20240131_235959_")
            .unwrap()
            .strip_suffix(".json")
            .unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn raw_passthrough_writes_exact_bytes_under_data_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(Some(dir.path().to_path_buf()), None);

        sink.store_raw(
            "<Notification/>".to_string(),
            datetime!(2024-01-31 23:59:59 UTC),
        )
        .await
        .unwrap();

        let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        assert!(entry
            .file_name()
            .to_str()
            .unwrap()
            .starts_with("data_"));
        assert_eq!(
            std::fs::read_to_string(entry.path()).unwrap(),
            "<Notification/>"
        );
    }

    #[tokio::test]
    async fn missing_directory_is_created_and_reused() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("does/not/exist/yet");
        let sink = FileSink::new(None, Some(nested.clone()));

        let record = IngestRecord::from_raw(
            r#"{"a":1}"#.to_string(),
            datetime!(2024-01-31 23:59:59 UTC),
        );
        sink.store(RecordKind::Log, record).await.unwrap();
        assert!(nested.is_dir());

        let record = IngestRecord::from_raw(
            r#"{"b":2}"#.to_string(),
            datetime!(2024-01-31 23:59:59 UTC),
        );
        sink.store(RecordKind::Log, record).await.unwrap();
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn unconfigured_directory_fails_at_write_time() {
        let sink = FileSink::new(None, None);

        let result = sink
            .store_raw("hello".to_string(), datetime!(2024-01-31 23:59:59 UTC))
            .await;
        assert!(matches!(
            result,
            Err(IngestError::MissingStorageDir("data_folder_path"))
        ));

        let record = IngestRecord::from_raw(
            "{}".to_string(),
            datetime!(2024-01-31 23:59:59 UTC),
        );
        let result = sink.store(RecordKind::Log, record).await;
        assert!(matches!(
            result,
            Err(IngestError::MissingStorageDir("logs_folder_path"))
        ));
    }
}
