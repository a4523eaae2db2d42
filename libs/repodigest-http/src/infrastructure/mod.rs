//! Infrastructure adapters implementing domain ports

mod http_processor;

pub use http_processor::HttpQueryProcessor;
