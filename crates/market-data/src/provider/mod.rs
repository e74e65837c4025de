//! Market data provider implementations.
//!
//! This module contains:
//! - The Banxico SIE client for the USD/MXN FIX rate
//! - A moka-backed TTL cache shared by provider clients
//!
//! Providers parse upstream payloads into the crate's models and consult the
//! quota tracker before each outbound call. Caching sits in front of the
//! tracker: a cache hit is not an API call and is not counted.

pub mod banxico;
mod cache;

pub use banxico::BanxicoClient;
pub use cache::{ResponseCache, CACHE_CAPACITY};
