//! Request gates applied in front of the handlers

pub mod rate_limit;
pub mod trusted_host;

pub use rate_limit::enforce_rate_limit;
pub use trusted_host::{enforce_trusted_host, AllowedHosts};
