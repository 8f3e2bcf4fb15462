//! Delivery-run settlement: filter → aggregate → price → commit.
//!
//! [`prepare`] is pure: it reads the customers, resolves prices and returns
//! the rows of the run. Resetting pending units is a separate [`commit`]
//! that callers run only after the export succeeded and the operator
//! confirmed it.

use crate::{
    Customer, CustomerLedger, CustomerRef, EngineError, ResultEngine, ZoneRegistry,
    money::format_amount, text::normalize,
};

/// Optional filters of a delivery run. Blank values mean "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementFilter {
    pub zone: Option<String>,
    pub day: Option<String>,
}

impl SettlementFilter {
    #[must_use]
    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    #[must_use]
    pub fn day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    fn zone_key(&self) -> Option<String> {
        self.zone.as_deref().map(normalize).filter(|k| !k.is_empty())
    }

    fn day_key(&self) -> Option<String> {
        self.day.as_deref().map(normalize).filter(|k| !k.is_empty())
    }
}

/// Result of preparing a run. The two empty cases are expected outcomes,
/// not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// A non-blank zone or day filter selected no customer at all.
    NoMatch(SettlementFilter),
    /// Customers matched but none has pending units.
    NothingToSettle,
    Ready(Settlement),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementRow {
    pub customer: CustomerRef,
    pub name: String,
    pub tax_id: String,
    pub phone: String,
    pub address: String,
    pub zone: String,
    pub units: u64,
    pub unit_price: u64,
    pub amount: u64,
}

impl SettlementRow {
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount)
    }

    /// Cells in sheet order: name, RUT, phone, address, zone, units, amount.
    #[must_use]
    pub fn cells(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.tax_id.clone(),
            self.phone.clone(),
            self.address.clone(),
            self.zone.clone(),
            self.units.to_string(),
            self.formatted_amount(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Canonical zone of the filter, if one was set.
    pub zone: Option<String>,
    pub rows: Vec<SettlementRow>,
    pub total_units: u64,
    pub total_amount: u64,
}

impl Settlement {
    #[must_use]
    pub fn total_cells(&self) -> [String; 7] {
        [
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            self.total_units.to_string(),
            format_amount(self.total_amount),
        ]
    }

    /// Rows handed to the export, followed by the totals row.
    #[must_use]
    pub fn sheet_rows(&self) -> Vec<[String; 7]> {
        let mut rows: Vec<_> = self.rows.iter().map(SettlementRow::cells).collect();
        rows.push(self.total_cells());
        rows
    }
}

/// Builds the row-set of a delivery run.
pub fn prepare(
    customers: &[Customer],
    zones: &ZoneRegistry,
    filter: &SettlementFilter,
) -> ResultEngine<SettlementOutcome> {
    let mut selected: Vec<(CustomerRef, &Customer)> = customers.iter().enumerate().collect();

    if let Some(zone_key) = filter.zone_key() {
        selected.retain(|(_, c)| normalize(&c.zone) == zone_key);
        if selected.is_empty() {
            return Ok(SettlementOutcome::NoMatch(filter.clone()));
        }
    }
    if let Some(day_key) = filter.day_key() {
        selected.retain(|(_, c)| {
            c.delivery_day
                .as_deref()
                .is_some_and(|day| normalize(day) == day_key)
        });
        if selected.is_empty() {
            return Ok(SettlementOutcome::NoMatch(filter.clone()));
        }
    }

    selected.retain(|(_, c)| c.pending_units > 0);
    if selected.is_empty() {
        return Ok(SettlementOutcome::NothingToSettle);
    }

    let overflow = || EngineError::validation("amount", "settlement total too large");
    let mut rows = Vec::with_capacity(selected.len());
    let mut total_units: u64 = 0;
    let mut total_amount: u64 = 0;
    for (at, customer) in selected {
        let unit_price = zones.price_for(&customer.zone);
        let amount = customer
            .pending_units
            .checked_mul(unit_price)
            .ok_or_else(overflow)?;
        total_units = total_units
            .checked_add(customer.pending_units)
            .ok_or_else(overflow)?;
        total_amount = total_amount.checked_add(amount).ok_or_else(overflow)?;
        rows.push(SettlementRow {
            customer: at,
            name: customer.name.clone(),
            tax_id: customer.tax_id.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            zone: customer.zone.clone(),
            units: customer.pending_units,
            unit_price,
            amount,
        });
    }

    tracing::debug!(
        customers = rows.len(),
        total_units,
        total_amount,
        "prepared settlement"
    );
    Ok(SettlementOutcome::Ready(Settlement {
        zone: filter
            .zone_key()
            .and_then(|_| filter.zone.as_deref())
            .map(|zone| zones.canonicalize(zone)),
        rows,
        total_units,
        total_amount,
    }))
}

/// Zeroes pending units of every settled customer and returns how many were
/// reset. A row whose customer was removed or renamed since [`prepare`] is
/// skipped.
pub fn commit(settlement: &Settlement, customers: &mut CustomerLedger) -> usize {
    let all = customers.all_mut();
    let mut reset = 0;
    for row in &settlement.rows {
        match all.get_mut(row.customer) {
            Some(customer) if customer.name == row.name => {
                customer.pending_units = 0;
                reset += 1;
            }
            _ => tracing::warn!(
                customer = row.customer,
                name = %row.name,
                "settled customer changed before commit, skipping"
            ),
        }
    }
    reset
}
