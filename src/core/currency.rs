//! Currency rate lookup and caching.
//!
//! Rates are fetched per base currency as a whole table and cached for a
//! fixed validity window. The cache lives and dies with the process.

use crate::core::error::ConversionError;
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// How long a fetched rate table stays valid.
pub const RATE_VALIDITY: Duration = Duration::from_secs(3600);

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full rate table for a base currency.
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>>;
}

struct RateEntry {
    rates: HashMap<String, f64>,
    fetched_at: Instant,
}

impl RateEntry {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < RATE_VALIDITY
    }
}

/// Caches one rate table per base currency observed.
///
/// A fresh entry answers lookups without touching the provider; a missing
/// or stale entry triggers exactly one fetch for this call. A successful
/// fetch replaces the whole entry; a failed one leaves whatever was cached
/// untouched. Concurrent fetches for the same base are last-writer-wins.
pub struct RateCache {
    provider: Arc<dyn RateProvider>,
    entries: Mutex<HashMap<String, RateEntry>>,
}

impl RateCache {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        RateCache {
            provider,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up the `base -> target` rate, fetching the table for `base`
    /// when no fresh entry exists.
    pub async fn get_rate(&self, base: &str, target: &str) -> Result<f64, ConversionError> {
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(base) {
                if entry.is_fresh() {
                    debug!("Rate cache hit for base {}", base);
                    return entry.rates.get(target).copied().ok_or_else(|| {
                        ConversionError::RateUnavailable {
                            base: base.to_string(),
                            target: target.to_string(),
                        }
                    });
                }
                debug!("Rate cache entry stale for base {}", base);
            } else {
                debug!("Rate cache miss for base {}", base);
            }
        }

        // Lock released during the fetch; the entry is only replaced after
        // a complete successful response.
        let rates =
            self.provider
                .fetch_rates(base)
                .await
                .map_err(|source| ConversionError::Fetch {
                    base: base.to_string(),
                    source,
                })?;
        let rate = rates.get(target).copied();

        let mut entries = self.entries.lock().await;
        entries.insert(
            base.to_string(),
            RateEntry {
                rates,
                fetched_at: Instant::now(),
            },
        );

        rate.ok_or_else(|| ConversionError::RateUnavailable {
            base: base.to_string(),
            target: target.to_string(),
        })
    }

    /// Converts `amount` between currencies at the current rate. Identical
    /// currencies return the amount unchanged without consulting the cache.
    /// The result keeps full precision; rounding belongs to the caller's
    /// presentation boundary.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, ConversionError> {
        if from == to {
            return Ok(amount);
        }
        let rate = self.get_rate(from, to).await?;
        // A non-finite rate from the provider is as unusable as a missing one.
        let rate = Decimal::from_f64(rate).ok_or_else(|| ConversionError::RateUnavailable {
            base: from.to_string(),
            target: to.to_string(),
        })?;
        Ok(amount * rate)
    }
}
