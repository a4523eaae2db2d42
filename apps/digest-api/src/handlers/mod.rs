//! Request handlers

pub mod ingestion;
