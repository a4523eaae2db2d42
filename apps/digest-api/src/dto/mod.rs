//! Data transfer objects

pub mod ingestion;
