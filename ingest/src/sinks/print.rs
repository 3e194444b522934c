use async_trait::async_trait;
use metrics::counter;
use time::OffsetDateTime;

use crate::api::IngestError;
use crate::payload::{IngestRecord, RecordKind};
use crate::sinks::RecordSink;

/// Logs records instead of persisting them. Used for local debugging
/// and for the log-only deployment flavor of the push routes.
pub struct PrintSink {}

#[async_trait]
impl RecordSink for PrintSink {
    async fn store(&self, kind: RecordKind, record: IngestRecord) -> Result<(), IngestError> {
        tracing::info!(
            kind = kind.prefix(),
            received_at = ?record.received_at,
            raw = %record.raw_payload,
            "record received"
        );
        counter!("ingest_records_stored_total", "kind" => kind.prefix()).increment(1);
        Ok(())
    }

    async fn store_raw(
        &self,
        raw: String,
        received_at: OffsetDateTime,
    ) -> Result<(), IngestError> {
        tracing::info!(received_at = ?received_at, raw = %raw, "raw payload received");
        counter!("ingest_records_stored_total", "kind" => "data").increment(1);
        Ok(())
    }
}
