//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client with connection pooling so
//! every panel reuses the same TLS sessions against the Gemini API.
//!
//! Only the connect phase is bounded. Generation calls wait as long as the
//! transport allows; panels block re-entry instead of timing out.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for Gemini API calls
pub static GEMINI_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(concat!("customer-matrix/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build tuned HTTP client: {}. Using defaults.", e);
            Client::new()
        })
});

/// Get the global Gemini HTTP client
///
/// The client is created on first access and reused for all subsequent calls.
#[inline]
pub fn gemini_client() -> &'static Client {
    &GEMINI_CLIENT
}
