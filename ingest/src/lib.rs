pub mod api;
pub mod config;
pub mod ingest;
pub mod payload;
pub mod prometheus;
pub mod router;
pub mod server;
pub mod sinks;
pub mod time;
