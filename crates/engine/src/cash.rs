//! Manual cash ledger.
//!
//! Movements are appended by hand and never edited; a wrong one is deleted and
//! typed again. They are not linked to customers or delivery runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, text::normalize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementCategory {
    #[serde(rename = "Ingreso")]
    Income,
    #[serde(rename = "Egreso")]
    Expense,
    #[serde(rename = "Otro")]
    Other,
}

impl MovementCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Ingreso",
            Self::Expense => "Egreso",
            Self::Other => "Otro",
        }
    }
}

impl TryFrom<&str> for MovementCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match normalize(value).as_str() {
            "ingreso" | "income" => Ok(Self::Income),
            "egreso" | "gasto" | "expense" => Ok(Self::Expense),
            "otro" | "other" => Ok(Self::Other),
            _ => Err(EngineError::validation(
                "category",
                format!("unknown movement category: {value}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashMovement {
    /// Time-ordered UUID. Older documents may lack it; see
    /// [`CashLedger::backfill_ids`].
    #[serde(default)]
    pub id: String,
    #[serde(rename = "fecha", default)]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "tipo")]
    pub category: MovementCategory,
    #[serde(rename = "monto")]
    pub amount: Money,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "referencia", default)]
    pub reference: String,
}

/// Sums of the ledger per category. `balance` is income minus expense;
/// `Other` movements are reported but do not move the balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CashTotals {
    pub income: Money,
    pub expense: Money,
    pub other: Money,
    pub balance: Money,
}

#[derive(Clone, Debug, Default)]
pub struct CashLedger {
    movements: Vec<CashMovement>,
}

impl CashLedger {
    #[must_use]
    pub fn new(movements: Vec<CashMovement>) -> Self {
        Self { movements }
    }

    #[must_use]
    pub fn movements(&self) -> &[CashMovement] {
        &self.movements
    }

    pub fn record(
        &mut self,
        category: MovementCategory,
        amount: Money,
        description: &str,
        reference: &str,
        at: DateTime<Utc>,
    ) -> ResultEngine<&CashMovement> {
        if !amount.is_positive() {
            return Err(EngineError::validation(
                "amount",
                format!("must be > 0, got {amount}"),
            ));
        }
        self.movements.push(CashMovement {
            id: Uuid::now_v7().to_string(),
            timestamp: at,
            category,
            amount,
            description: description.trim().to_string(),
            reference: reference.trim().to_string(),
        });
        Ok(&self.movements[self.movements.len() - 1])
    }

    pub fn delete(&mut self, id: &str) -> ResultEngine<CashMovement> {
        let position = self
            .movements
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("movement {id}")))?;
        Ok(self.movements.remove(position))
    }

    /// Sums the ledger per category. Stored amounts are not validated on
    /// load, so an overflowing sum is reported instead of wrapping.
    pub fn totals(&self) -> ResultEngine<CashTotals> {
        let overflow = || EngineError::validation("amount", "cash totals overflow");
        let mut totals = CashTotals::default();
        for movement in &self.movements {
            let slot = match movement.category {
                MovementCategory::Income => &mut totals.income,
                MovementCategory::Expense => &mut totals.expense,
                MovementCategory::Other => &mut totals.other,
            };
            *slot = slot.checked_add(movement.amount).ok_or_else(overflow)?;
        }
        totals.balance = totals
            .income
            .checked_sub(totals.expense)
            .ok_or_else(overflow)?;
        Ok(totals)
    }

    /// Movements whose stored amount is not positive. `record` never creates
    /// them; they can only come from a hand-edited document.
    pub fn non_positive(&self) -> impl Iterator<Item = &CashMovement> {
        self.movements.iter().filter(|m| !m.amount.is_positive())
    }

    /// Gives an id to every movement stored without one. Returns how many
    /// were filled in.
    pub fn backfill_ids(&mut self) -> usize {
        let mut filled = 0;
        for movement in self.movements.iter_mut().filter(|m| m.id.is_empty()) {
            movement.id = Uuid::now_v7().to_string();
            filled += 1;
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> CashLedger {
        let mut ledger = CashLedger::default();
        let now = Utc::now();
        ledger
            .record(MovementCategory::Income, Money::from_major(20_000), "Reparto", "", now)
            .unwrap();
        ledger
            .record(MovementCategory::Expense, Money::new(550_050), " Bencina ", "boleta 12", now)
            .unwrap();
        ledger
            .record(MovementCategory::Other, Money::from_major(100), "Cambio", "", now)
            .unwrap();
        ledger
    }

    #[test]
    fn totals_split_by_category() {
        let totals = ledger().totals().unwrap();
        assert_eq!(totals.income, Money::from_major(20_000));
        assert_eq!(totals.expense, Money::new(550_050));
        assert_eq!(totals.other, Money::from_major(100));
        assert_eq!(totals.balance, Money::new(2_000_000 - 550_050));
    }

    #[test]
    fn record_rejects_non_positive_amounts() {
        let mut ledger = CashLedger::default();
        for amount in [Money::ZERO, Money::new(-1)] {
            let err = ledger
                .record(MovementCategory::Income, amount, "x", "", Utc::now())
                .unwrap_err();
            assert!(err.is_validation());
        }
        assert!(ledger.movements().is_empty());
    }

    #[test]
    fn record_trims_text_and_assigns_unique_ids() {
        let ledger = ledger();
        let expense = &ledger.movements()[1];
        assert_eq!(expense.description, "Bencina");
        assert_eq!(expense.reference, "boleta 12");
        let mut ids: Vec<_> = ledger.movements().iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn delete_by_id() {
        let mut ledger = ledger();
        let id = ledger.movements()[0].id.clone();
        let removed = ledger.delete(&id).unwrap();
        assert_eq!(removed.category, MovementCategory::Income);
        assert_eq!(ledger.movements().len(), 2);
        assert_eq!(ledger.delete(&id).unwrap_err(), EngineError::NotFound(format!("movement {id}")));
    }

    #[test]
    fn backfill_only_touches_missing_ids() {
        let raw = r#"[
            {"tipo":"Ingreso","monto":1000,"descripcion":"a"},
            {"id":"keep","tipo":"Otro","monto":5}
        ]"#;
        let movements: Vec<CashMovement> = serde_json::from_str(raw).unwrap();
        let mut ledger = CashLedger::new(movements);
        assert_eq!(ledger.backfill_ids(), 1);
        assert!(!ledger.movements()[0].id.is_empty());
        assert_eq!(ledger.movements()[1].id, "keep");
        assert_eq!(ledger.backfill_ids(), 0);
    }

    #[test]
    fn category_parses_both_languages() {
        assert_eq!(MovementCategory::try_from("EGRESO").unwrap(), MovementCategory::Expense);
        assert_eq!(MovementCategory::try_from("income").unwrap(), MovementCategory::Income);
        assert!(MovementCategory::try_from("loan").is_err());
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let raw = r#"[
            {"tipo":"Ingreso","monto":9223372036854775807},
            {"tipo":"Ingreso","monto":9223372036854775807}
        ]"#;
        let ledger = CashLedger::new(serde_json::from_str(raw).unwrap());
        assert!(ledger.totals().unwrap_err().is_validation());

        let raw = r#"[
            {"tipo":"Ingreso","monto":-9223372036854775807},
            {"tipo":"Egreso","monto":9223372036854775807}
        ]"#;
        let ledger = CashLedger::new(serde_json::from_str(raw).unwrap());
        assert!(ledger.totals().is_err());
    }

    #[test]
    fn stored_non_positive_amounts_are_listed() {
        let raw = r#"[
            {"id":"a","tipo":"Ingreso","monto":100},
            {"id":"b","tipo":"Egreso","monto":-5},
            {"id":"c","tipo":"Otro","monto":0}
        ]"#;
        let ledger = CashLedger::new(serde_json::from_str(raw).unwrap());
        let ids: Vec<_> = ledger.non_positive().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }
}
