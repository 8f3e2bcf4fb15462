use crate::{
    CashLedger, CustomerLedger, DocumentPatch, DocumentStore, EngineError, ResultEngine,
    ZoneRegistry, zones::DEFAULT_UNIT_PRICE,
};

mod cash;
mod customers;
mod settlement;
mod zones;

pub use settlement::Delivery;

/// In-memory state of the delivery book, backed by a [`DocumentStore`].
///
/// Every mutating operation ends by saving the keys it owns with their full
/// current value. A mutation whose save failed is still applied in memory and
/// the error is returned.
#[derive(Debug)]
pub struct Engine {
    store: DocumentStore,
    customers: CustomerLedger,
    zones: ZoneRegistry,
    cash: CashLedger,
    load_error: Option<EngineError>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Error met while loading the document, if the engine had to start from
    /// an empty one.
    #[must_use]
    pub fn load_error(&self) -> Option<&EngineError> {
        self.load_error.as_ref()
    }

    fn save_customers(&self) -> ResultEngine<()> {
        self.store.save(&DocumentPatch {
            customers: Some(self.customers.all()),
            known_zones: Some(self.zones.zones()),
            ..DocumentPatch::default()
        })
    }

    fn save_zones(&self) -> ResultEngine<()> {
        self.store.save(&DocumentPatch {
            default_price: Some(self.zones.default_price()),
            zone_prices: Some(self.zones.overrides()),
            known_zones: Some(self.zones.zones()),
            ..DocumentPatch::default()
        })
    }

    /// Writes every key, replacing whatever the stored document held for them.
    fn save_all(&self) -> ResultEngine<()> {
        self.store.save(&DocumentPatch {
            customers: Some(self.customers.all()),
            default_price: Some(self.zones.default_price()),
            zone_prices: Some(self.zones.overrides()),
            movements: Some(self.cash.movements()),
            known_zones: Some(self.zones.zones()),
        })
    }

    fn save_movements(&self) -> ResultEngine<()> {
        self.store.save(&DocumentPatch {
            movements: Some(self.cash.movements()),
            ..DocumentPatch::default()
        })
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<DocumentStore>,
}

impl EngineBuilder {
    /// Pass the document store
    pub fn store(mut self, store: DocumentStore) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine` from the stored document.
    ///
    /// Zone spellings are brought to canonical form; they reach the disk with
    /// the next save. Missing movement ids are filled in and saved at once so
    /// they stay stable across runs. An unreadable document is copied aside
    /// and replaced by the fresh one, so later partial saves cannot merge
    /// onto the broken keys.
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self.store.unwrap_or_default();
        let loaded = store.load();
        let mut document = loaded.document;

        let default_price = if document.default_price == 0 {
            tracing::warn!(fallback = DEFAULT_UNIT_PRICE, "stored default price is 0");
            DEFAULT_UNIT_PRICE
        } else {
            document.default_price
        };
        let mut zones = ZoneRegistry::new(default_price, document.zone_prices);
        zones.rebuild(&document.known_zones, &mut document.customers);

        let mut cash = CashLedger::new(document.movements);
        let filled = cash.backfill_ids();
        for movement in cash.non_positive() {
            tracing::warn!(
                id = %movement.id,
                amount = %movement.amount,
                "stored cash movement is not positive"
            );
        }

        tracing::info!(
            path = %store.path().display(),
            customers = document.customers.len(),
            zones = zones.zones().len(),
            movements = cash.movements().len(),
            "loaded delivery book"
        );
        let engine = Engine {
            store,
            customers: CustomerLedger::new(document.customers),
            zones,
            cash,
            load_error: loaded.error,
        };

        if engine.load_error.is_some() {
            engine.store.set_aside()?;
            engine.save_all()?;
        } else if filled > 0 {
            tracing::info!(filled, "assigned ids to stored cash movements");
            engine.save_movements()?;
        }
        Ok(engine)
    }
}
