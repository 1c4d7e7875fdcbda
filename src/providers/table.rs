use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::rate_provider::RateProvider;
use crate::rates::{MissingRatePolicy, RateTable};

/// RateProvider backed by the static rate table.
pub struct TableRateProvider {
    table: Arc<RateTable>,
    policy: MissingRatePolicy,
}

impl TableRateProvider {
    pub fn new(table: Arc<RateTable>, policy: MissingRatePolicy) -> Self {
        TableRateProvider { table, policy }
    }
}

#[async_trait]
impl RateProvider for TableRateProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        if let Some(rate) = self.table.rate(from, to) {
            debug!("Table rate for {}->{}: {}", from, to, rate);
            return Ok(rate);
        }

        match self.policy {
            MissingRatePolicy::Parity => {
                debug!("No rate for {}->{}, falling back to parity", from, to);
                Ok(1.0)
            }
            MissingRatePolicy::Fixed(rate) => {
                debug!("No rate for {}->{}, using fixed fallback {}", from, to, rate);
                Ok(rate)
            }
            MissingRatePolicy::Fail => Err(anyhow!(
                "No rate configured for currency pair: {from}->{to}"
            )),
        }
    }
}
