use chrono::{DateTime, Utc};

use crate::{CashMovement, CashTotals, Money, MovementCategory, ResultEngine};

use super::Engine;

impl Engine {
    #[must_use]
    pub fn movements(&self) -> &[CashMovement] {
        self.cash.movements()
    }

    pub fn cash_totals(&self) -> ResultEngine<CashTotals> {
        self.cash.totals()
    }

    /// Appends a manual movement and persists the ledger.
    pub fn record_movement(
        &mut self,
        category: MovementCategory,
        amount: Money,
        description: &str,
        reference: &str,
        at: DateTime<Utc>,
    ) -> ResultEngine<CashMovement> {
        let movement = self
            .cash
            .record(category, amount, description, reference, at)?
            .clone();
        tracing::info!(id = %movement.id, category = movement.category.as_str(), %amount, "recorded cash movement");
        self.save_movements()?;
        Ok(movement)
    }

    pub fn delete_movement(&mut self, id: &str) -> ResultEngine<CashMovement> {
        let removed = self.cash.delete(id)?;
        tracing::info!(id, "deleted cash movement");
        self.save_movements()?;
        Ok(removed)
    }
}
