//! Zone registry: canonical zone names and per-zone unit prices.
//!
//! Two co-maintained maps answer "is this the same zone": normalized key →
//! canonical display name, and canonical name → price override. The first
//! spelling seen for a key wins and every later spelling is rewritten to it.

use std::collections::{BTreeMap, HashMap};

use crate::{
    Customer, EngineError, ResultEngine,
    text::{normalize, title_case},
};

/// Unit price used when a document does not carry one.
pub const DEFAULT_UNIT_PRICE: u64 = 1000;

#[derive(Clone, Debug)]
pub struct ZoneRegistry {
    by_key: HashMap<String, String>,
    names: Vec<String>,
    prices: BTreeMap<String, u64>,
    default_price: u64,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_PRICE, BTreeMap::new())
    }
}

impl ZoneRegistry {
    /// Creates a registry holding raw overrides. Call [`rebuild`] to bring
    /// their keys to canonical form.
    ///
    /// [`rebuild`]: ZoneRegistry::rebuild
    #[must_use]
    pub fn new(default_price: u64, prices: BTreeMap<String, u64>) -> Self {
        Self {
            by_key: HashMap::new(),
            names: Vec::new(),
            prices,
            default_price,
        }
    }

    /// Canonical spelling for `raw`: the registered one when the normalized
    /// key is known, the title-cased input otherwise.
    #[must_use]
    pub fn canonicalize(&self, raw: &str) -> String {
        let key = normalize(raw);
        if key.is_empty() {
            return String::new();
        }
        match self.by_key.get(&key) {
            Some(canonical) => canonical.clone(),
            None => title_case(raw),
        }
    }

    /// Registers `raw` if its key is new and returns the canonical name.
    pub fn register(&mut self, raw: &str) -> String {
        let key = normalize(raw);
        if key.is_empty() {
            return String::new();
        }
        if let Some(canonical) = self.by_key.get(&key) {
            return canonical.clone();
        }
        let canonical = title_case(raw);
        tracing::debug!(zone = %canonical, "registered zone");
        self.by_key.insert(key, canonical.clone());
        self.names.push(canonical.clone());
        self.names.sort_by_cached_key(|name| normalize(name));
        canonical
    }

    /// Resets the registry from the stored zone list, then rewrites every
    /// override key and every customer zone to its canonical spelling.
    ///
    /// Zones referenced only by customers or overrides get registered too, so
    /// afterwards every zone in use is known. Overrides of 0 or with a blank
    /// zone are dropped without registering anything. When two override keys
    /// collapse to the same zone the first one wins.
    pub fn rebuild(&mut self, stored_zones: &[String], customers: &mut [Customer]) {
        self.by_key.clear();
        self.names.clear();
        for zone in stored_zones {
            self.register(zone);
        }

        let raw_prices = std::mem::take(&mut self.prices);
        for (zone, price) in raw_prices {
            if normalize(&zone).is_empty() || price == 0 {
                tracing::warn!(zone = %zone, price, "dropping invalid price override");
                continue;
            }
            let canonical = self.register(&zone);
            self.prices.entry(canonical).or_insert(price);
        }

        for customer in customers.iter_mut() {
            customer.zone = self.register(&customer.zone);
        }
    }

    /// Effective unit price of `zone`. Unknown or empty zones get the
    /// default price.
    #[must_use]
    pub fn price_for(&self, zone: &str) -> u64 {
        self.override_for(zone).unwrap_or(self.default_price)
    }

    /// Custom price of `zone`, if any.
    #[must_use]
    pub fn override_for(&self, zone: &str) -> Option<u64> {
        self.by_key
            .get(&normalize(zone))
            .and_then(|canonical| self.prices.get(canonical))
            .copied()
    }

    /// Sets a custom unit price for `zone`, registering the zone.
    pub fn set_price(&mut self, zone: &str, price: i64) -> ResultEngine<String> {
        let price = positive_price(price)?;
        let canonical = self.register(zone);
        if canonical.is_empty() {
            return Err(EngineError::validation("zone", "must not be empty"));
        }
        self.prices.insert(canonical.clone(), price);
        Ok(canonical)
    }

    /// Removes the custom price of `zone`. Returns `false` when there was none.
    pub fn clear_price(&mut self, zone: &str) -> bool {
        let Some(canonical) = self.by_key.get(&normalize(zone)) else {
            return false;
        };
        self.prices.remove(canonical).is_some()
    }

    /// Changes the price applied to zones without an override.
    pub fn set_default_price(&mut self, price: i64) -> ResultEngine<()> {
        self.default_price = positive_price(price)?;
        Ok(())
    }

    #[must_use]
    pub fn default_price(&self) -> u64 {
        self.default_price
    }

    /// Known zones, sorted by their comparison key.
    #[must_use]
    pub fn zones(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn overrides(&self) -> &BTreeMap<String, u64> {
        &self.prices
    }

    #[must_use]
    pub fn contains(&self, zone: &str) -> bool {
        self.by_key.contains_key(&normalize(zone))
    }
}

fn positive_price(price: i64) -> ResultEngine<u64> {
    u64::try_from(price)
        .ok()
        .filter(|price| *price > 0)
        .ok_or_else(|| EngineError::validation("price", format!("must be > 0, got {price}")))
}
