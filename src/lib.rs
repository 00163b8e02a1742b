pub mod api;
pub mod config;
pub mod ingest;
pub mod ingest_log;
pub mod report;
pub mod report_store;
pub mod status;
