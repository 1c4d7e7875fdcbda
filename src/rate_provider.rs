//! Provides currency rate lookups for the application.

use anyhow::Result;
use async_trait::async_trait;

/// Source of exchange rates. The converter only ever talks to this
/// trait, so the backing source (static table today, remote service
/// tomorrow) can change without touching the conversion logic.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
