//! Conversion session state and the recompute derivation.
//!
//! The converter owns four pieces of state (source code, target code,
//! amount text, derived converted text) plus a pending flag. Every
//! mutator stores its input and re-runs the derivation; the derivation
//! snapshots its inputs, waits the configured delay, resolves the rate
//! through the provider and commits the formatted result only if no
//! newer trigger has fired in the meantime.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::currency::{Currency, CurrencyCatalog};
use crate::notify::{Notification, Notifier};
use crate::rate_provider::RateProvider;
use crate::rates::RateTable;

/// Session-scoped conversion state. `amount_text` is user-controlled
/// free text and not guaranteed numeric; `converted_text` is always a
/// derived, formatted decimal string (or "0" for unparsable input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionState {
    pub source: String,
    pub target: String,
    pub amount_text: String,
    pub converted_text: String,
    pub pending: bool,
}

/// Initial values for a conversion session.
#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub source: String,
    pub target: String,
    pub amount: String,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        SessionDefaults {
            source: "USD".to_string(),
            target: "EUR".to_string(),
            amount: "1".to_string(),
        }
    }
}

struct Inner {
    state: ConversionState,
    // Bumped by every trigger; a derivation only commits if the value
    // it snapshotted is still current.
    generation: u64,
}

struct Snapshot {
    amount: f64,
    amount_text: String,
    source: String,
    target: String,
    generation: u64,
}

pub struct Converter<P, N> {
    catalog: Arc<CurrencyCatalog>,
    table: Arc<RateTable>,
    provider: P,
    notifier: N,
    delay: Duration,
    inner: Mutex<Inner>,
}

impl<P: RateProvider, N: Notifier> Converter<P, N> {
    pub fn new(
        catalog: Arc<CurrencyCatalog>,
        table: Arc<RateTable>,
        provider: P,
        notifier: N,
        delay: Duration,
        defaults: SessionDefaults,
    ) -> Self {
        Converter {
            catalog,
            table,
            provider,
            notifier,
            delay,
            inner: Mutex::new(Inner {
                state: ConversionState {
                    source: defaults.source,
                    target: defaults.target,
                    amount_text: defaults.amount,
                    converted_text: "0".to_string(),
                    pending: false,
                },
                generation: 0,
            }),
        }
    }

    /// Snapshot of the current state for rendering.
    pub async fn state(&self) -> ConversionState {
        self.inner.lock().await.state.clone()
    }

    /// Stores the raw amount text verbatim and re-derives the result.
    /// Non-numeric text is not an error; the derivation degrades it to
    /// a "0" result.
    pub async fn set_amount(&self, text: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.state.amount_text = text.to_string();
        }
        self.recompute().await;
    }

    /// Updates the source currency code. The code is stored verbatim;
    /// unknown codes still convert (subject to the provider's
    /// missing-rate policy) and resolve to the catalog's first entry
    /// for display.
    pub async fn set_source(&self, code: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.state.source = code.to_string();
        }
        self.recompute().await;
    }

    /// Updates the target currency code. Symmetric to `set_source`.
    pub async fn set_target(&self, code: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.state.target = code.to_string();
        }
        self.recompute().await;
    }

    /// Exchanges source and target, and feeds the previous output back
    /// as the new input. One compound transition, then one recompute.
    pub async fn swap(&self) {
        {
            let mut inner = self.inner.lock().await;
            let state = &mut inner.state;
            std::mem::swap(&mut state.source, &mut state.target);
            std::mem::swap(&mut state.amount_text, &mut state.converted_text);
        }
        self.recompute().await;
    }

    /// Re-derives `converted_text` from the current inputs.
    pub async fn recompute(&self) {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            let generation = inner.generation;
            let state = &mut inner.state;

            let amount = match state.amount_text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => {
                    debug!("Unparsable amount {:?}, result is 0", state.amount_text);
                    state.converted_text = "0".to_string();
                    state.pending = false;
                    return;
                }
            };

            state.pending = true;
            Snapshot {
                amount,
                amount_text: state.amount_text.clone(),
                source: state.source.clone(),
                target: state.target.clone(),
                generation,
            }
        };

        // Simulated latency for the pending affordance; no I/O happens
        // here and correctness does not depend on it.
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self
            .provider
            .get_rate(&snapshot.source, &snapshot.target)
            .await
        {
            Ok(rate) => {
                let result = format!("{:.2}", snapshot.amount * rate);
                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != snapshot.generation {
                        debug!(
                            "Discarding stale conversion {} {}->{}",
                            snapshot.amount_text, snapshot.source, snapshot.target
                        );
                        return;
                    }
                    inner.state.converted_text = result.clone();
                    inner.state.pending = false;
                }
                self.notifier.notify(&Notification::conversion_updated(
                    &snapshot.amount_text,
                    &snapshot.source,
                    &result,
                    &snapshot.target,
                ));
            }
            Err(e) => {
                warn!(
                    "Rate lookup failed for {}->{}: {}",
                    snapshot.source, snapshot.target, e
                );
                {
                    let mut inner = self.inner.lock().await;
                    if inner.generation != snapshot.generation {
                        return;
                    }
                    // Keep the previous output; only the pending flag
                    // is cleared.
                    inner.state.pending = false;
                }
                self.notifier.notify(&Notification::conversion_failed());
            }
        }
    }

    /// Pairwise rate formatted for display, four decimal places.
    /// Unlisted pairs render as "1.0000". Informational only; the
    /// conversion math goes through the provider instead.
    pub fn rate_display(&self, from: &str, to: &str) -> String {
        self.table.display_rate(from, to)
    }

    /// Display metadata for a code, falling back to the catalog's
    /// first entry for unknown codes.
    pub fn currency(&self, code: &str) -> &Currency {
        self.catalog.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationVariant;
    use crate::providers::table::TableRateProvider;
    use crate::rates::MissingRatePolicy;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    struct RecordingNotifier {
        events: std::sync::Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(RecordingNotifier {
                events: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<Notification> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for Arc<RecordingNotifier> {
        fn notify(&self, notification: &Notification) {
            self.events.lock().unwrap().push(notification.clone());
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl RateProvider for FailingProvider {
        async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
            Err(anyhow!("Rate service unavailable for {from}->{to}"))
        }
    }

    fn builtin_converter(
        notifier: Arc<RecordingNotifier>,
    ) -> Converter<TableRateProvider, Arc<RecordingNotifier>> {
        let table = Arc::new(RateTable::builtin());
        let provider = TableRateProvider::new(Arc::clone(&table), MissingRatePolicy::Parity);
        Converter::new(
            Arc::new(CurrencyCatalog::builtin()),
            table,
            provider,
            notifier,
            Duration::ZERO,
            SessionDefaults::default(),
        )
    }

    #[tokio::test]
    async fn test_default_session_converts_one_usd_to_eur() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.recompute().await;

        let state = converter.state().await;
        assert_eq!(state.source, "USD");
        assert_eq!(state.target, "EUR");
        assert_eq!(state.amount_text, "1");
        assert_eq!(state.converted_text, "0.85");
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn test_known_pair_formats_two_decimals() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_amount("100").await;

        assert_eq!(converter.state().await.converted_text, "85.00");
        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "100 USD = 85.00 EUR");
        assert_eq!(events[0].variant, NotificationVariant::Default);
    }

    #[tokio::test]
    async fn test_tjs_to_gbp() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_source("TJS").await;
        converter.set_target("GBP").await;
        converter.set_amount("10").await;

        assert_eq!(converter.state().await.converted_text, "0.67");
    }

    #[tokio::test]
    async fn test_absent_pair_parity_fallback() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_source("GBP").await;
        converter.set_target("TJS").await;
        converter.set_amount("10").await;

        // GBP has no base row in the table; parity applies.
        assert_eq!(converter.state().await.converted_text, "10.00");
    }

    #[tokio::test]
    async fn test_non_numeric_amount_degrades_to_zero() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        for text in ["", "abc", "12abc", "NaN", "  "] {
            converter.set_amount(text).await;
            let state = converter.state().await;
            assert_eq!(state.converted_text, "0", "amount {text:?}");
            assert!(!state.pending);
        }
        // No notification for unparsable input.
        assert!(notifier.events().is_empty());
    }

    #[tokio::test]
    async fn test_amount_text_stored_verbatim() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_amount("  3 ").await;
        let state = converter.state().await;
        assert_eq!(state.amount_text, "  3 ");
        assert_eq!(state.converted_text, "2.55");
    }

    #[tokio::test]
    async fn test_swap_feeds_output_back_as_input() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_amount("1").await;
        assert_eq!(converter.state().await.converted_text, "0.85");

        converter.swap().await;

        let state = converter.state().await;
        assert_eq!(state.source, "EUR");
        assert_eq!(state.target, "USD");
        // The previous output became the new input, and the recompute
        // that follows the swap derived a fresh output from it.
        assert_eq!(state.amount_text, "0.85");
        assert_eq!(state.converted_text, "1.00"); // 0.85 * 1.18
    }

    #[tokio::test]
    async fn test_swap_twice_restores_code_pair() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_amount("1").await;
        converter.swap().await;
        converter.swap().await;

        let state = converter.state().await;
        assert_eq!(state.source, "USD");
        assert_eq!(state.target, "EUR");
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_previous_output() {
        let notifier = RecordingNotifier::new();
        let table = Arc::new(RateTable::builtin());
        let converter = Converter::new(
            Arc::new(CurrencyCatalog::builtin()),
            table,
            FailingProvider,
            Arc::clone(&notifier),
            Duration::ZERO,
            SessionDefaults::default(),
        );

        converter.set_amount("100").await;

        let state = converter.state().await;
        assert_eq!(state.converted_text, "0");
        assert!(!state.pending);

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Conversion failed");
        assert_eq!(events[0].variant, NotificationVariant::Destructive);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_flag_during_delay() {
        let notifier = RecordingNotifier::new();
        let table = Arc::new(RateTable::builtin());
        let provider = TableRateProvider::new(Arc::clone(&table), MissingRatePolicy::Parity);
        let converter = Arc::new(Converter::new(
            Arc::new(CurrencyCatalog::builtin()),
            table,
            provider,
            Arc::clone(&notifier),
            Duration::from_millis(300),
            SessionDefaults::default(),
        ));

        let worker = Arc::clone(&converter);
        let handle = tokio::spawn(async move { worker.set_amount("100").await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(converter.state().await.pending);

        handle.await.unwrap();
        let state = converter.state().await;
        assert!(!state.pending);
        assert_eq!(state.converted_text, "85.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_recompute_is_discarded() {
        let notifier = RecordingNotifier::new();
        let table = Arc::new(RateTable::builtin());
        let provider = TableRateProvider::new(Arc::clone(&table), MissingRatePolicy::Parity);
        let converter = Converter::new(
            Arc::new(CurrencyCatalog::builtin()),
            table,
            provider,
            Arc::clone(&notifier),
            Duration::from_millis(300),
            SessionDefaults::default(),
        );

        // Two triggers in quick succession; only the later one may
        // commit, regardless of which derivation finishes first.
        tokio::join!(converter.set_amount("100"), converter.set_amount("5"));

        let state = converter.state().await;
        assert_eq!(state.amount_text, "5");
        assert_eq!(state.converted_text, "4.25");
        assert!(!state.pending);

        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "5 USD = 4.25 EUR");
    }

    #[tokio::test]
    async fn test_unknown_code_resolves_to_first_catalog_entry() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        converter.set_source("XYZ").await;

        let state = converter.state().await;
        assert_eq!(state.source, "XYZ");
        // Display metadata falls back; the stored code is untouched.
        assert_eq!(converter.currency("XYZ").code, "USD");
    }

    #[tokio::test]
    async fn test_rate_display() {
        let notifier = RecordingNotifier::new();
        let converter = builtin_converter(Arc::clone(&notifier));

        assert_eq!(converter.rate_display("USD", "EUR"), "0.8500");
        assert_eq!(converter.rate_display("GBP", "TJS"), "1.0000");
    }
}
