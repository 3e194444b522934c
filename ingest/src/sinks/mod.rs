use async_trait::async_trait;
use time::OffsetDateTime;

use crate::api::IngestError;
use crate::payload::{IngestRecord, RecordKind};

pub mod file;
pub mod print;

pub use file::FileSink;
pub use print::PrintSink;

/// Persistence behind the ingestion routes. Implementations are
/// write-only and fire-and-forget: no read path, no lifecycle beyond
/// file creation.
#[async_trait]
pub trait RecordSink {
    /// Persists a record wrapped in the JSON envelope.
    async fn store(&self, kind: RecordKind, record: IngestRecord) -> Result<(), IngestError>;

    /// Persists raw bytes exactly as received, unwrapped. Raw
    /// passthrough always lands in the data directory under the data
    /// prefix.
    async fn store_raw(&self, raw: String, received_at: OffsetDateTime)
        -> Result<(), IngestError>;
}
