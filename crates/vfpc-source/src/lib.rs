//! Live rule source for the SID validator.
//!
//! [`LiveSource`] fetches airport rules from the rule server on demand and
//! answers [`vfpc_core::Source`] queries from its cache without blocking on I/O.

pub mod cache;
pub mod client;
pub mod config;

pub use cache::LiveSource;
pub use client::{FetchError, RuleClient};
pub use config::{SourceConfig, DEFAULT_SOURCE_URL};
