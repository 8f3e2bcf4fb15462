use std::collections::BTreeMap;

use crate::ResultEngine;

use super::Engine;

impl Engine {
    /// Known zones in display order.
    #[must_use]
    pub fn zones(&self) -> &[String] {
        self.zones.zones()
    }

    #[must_use]
    pub fn zone_prices(&self) -> &BTreeMap<String, u64> {
        self.zones.overrides()
    }

    #[must_use]
    pub fn default_price(&self) -> u64 {
        self.zones.default_price()
    }

    /// Effective unit price of `zone`.
    #[must_use]
    pub fn price_for(&self, zone: &str) -> u64 {
        self.zones.price_for(zone)
    }

    #[must_use]
    pub fn canonical_zone(&self, raw: &str) -> String {
        self.zones.canonicalize(raw)
    }

    /// Adds a zone to the registry and returns its canonical name.
    pub fn register_zone(&mut self, raw: &str) -> ResultEngine<String> {
        let known = self.zones.contains(raw);
        let canonical = self.zones.register(raw);
        if !known && !canonical.is_empty() {
            self.save_zones()?;
        }
        Ok(canonical)
    }

    pub fn set_zone_price(&mut self, zone: &str, price: i64) -> ResultEngine<String> {
        let canonical = self.zones.set_price(zone, price)?;
        tracing::info!(zone = %canonical, price, "set zone price");
        self.save_zones()?;
        Ok(canonical)
    }

    /// Removes the custom price of `zone`. Returns `false`, without saving,
    /// when the zone had none.
    pub fn clear_zone_price(&mut self, zone: &str) -> ResultEngine<bool> {
        if !self.zones.clear_price(zone) {
            tracing::debug!(zone, "no price override to clear");
            return Ok(false);
        }
        tracing::info!(zone, "cleared zone price");
        self.save_zones()?;
        Ok(true)
    }

    pub fn set_default_price(&mut self, price: i64) -> ResultEngine<()> {
        self.zones.set_default_price(price)?;
        tracing::info!(price, "set default price");
        self.save_zones()
    }
}
