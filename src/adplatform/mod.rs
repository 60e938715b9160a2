//! Async ad-platform client, behind the `ads-client` feature. Fetches
//! per-account spend for a date range and degrades gracefully when some of
//! the accounts in a multi-account batch fail.

pub mod client;
pub mod types;

pub use client::AdPlatformClient;
pub use types::{AdAccount, SpendRow};
