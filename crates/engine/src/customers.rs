//! Customer records and the ledger of what each one is owed.
//!
//! `pending_units` is what the next delivery run must bring; `lifetime_units`
//! is everything ever ordered. Order intake bumps both together. Replacing
//! pending directly only raises lifetime when the new value exceeds it.

use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, ZoneRegistry,
    text::{clean_optional, clean_required, normalize},
};

/// Position of a customer in the ledger, as listed by [`CustomerLedger::all`].
pub type CustomerRef = usize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "nombre_completo", default)]
    pub name: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "comuna", default)]
    pub zone: String,
    #[serde(rename = "cajas_de_huevos", default)]
    pub pending_units: u64,
    #[serde(rename = "cajas_de_huevos_total", default)]
    pub lifetime_units: u64,
    #[serde(rename = "dia_reparto", default, skip_serializing_if = "Option::is_none")]
    pub delivery_day: Option<String>,
    /// Optional tax id (RUT).
    #[serde(rename = "rut", default, skip_serializing_if = "String::is_empty")]
    pub tax_id: String,
}

/// Fields of a customer being added. Empty optional values are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NewCustomer<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub zone: &'a str,
    pub delivery_day: Option<&'a str>,
    /// Optional tax id (RUT).
    pub tax_id: Option<&'a str>,
}

/// Fields to change on an existing customer. `None` keeps the current value.
#[derive(Clone, Debug, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zone: Option<String>,
    /// `Some("")` clears the delivery day.
    pub delivery_day: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CustomerLedger {
    customers: Vec<Customer>,
}

impl CustomerLedger {
    #[must_use]
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    #[must_use]
    pub fn all(&self) -> &[Customer] {
        &self.customers
    }

    pub(crate) fn all_mut(&mut self) -> &mut [Customer] {
        &mut self.customers
    }

    pub fn get(&self, at: CustomerRef) -> ResultEngine<&Customer> {
        self.customers
            .get(at)
            .ok_or_else(|| EngineError::NotFound(format!("customer #{at}")))
    }

    fn get_mut(&mut self, at: CustomerRef) -> ResultEngine<&mut Customer> {
        self.customers
            .get_mut(at)
            .ok_or_else(|| EngineError::NotFound(format!("customer #{at}")))
    }

    /// Adds a customer with nothing pending. The zone is registered.
    pub fn add(
        &mut self,
        zones: &mut ZoneRegistry,
        new: NewCustomer<'_>,
    ) -> ResultEngine<CustomerRef> {
        let name = clean_required(new.name, "name")?;
        let phone = clean_required(new.phone, "phone")?;
        let address = clean_required(new.address, "address")?;
        let zone = clean_required(new.zone, "zone")?;

        self.customers.push(Customer {
            name,
            phone,
            address,
            zone: zones.register(&zone),
            pending_units: 0,
            lifetime_units: 0,
            delivery_day: clean_optional(new.delivery_day),
            tax_id: clean_optional(new.tax_id).unwrap_or_default(),
        });
        Ok(self.customers.len() - 1)
    }

    /// Adds `quantity` to both pending and lifetime units.
    pub fn place_order(&mut self, at: CustomerRef, quantity: i64) -> ResultEngine<&Customer> {
        let quantity = u64::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| {
                EngineError::validation("quantity", format!("must be > 0, got {quantity}"))
            })?;
        let customer = self.get_mut(at)?;
        let too_large = || EngineError::validation("quantity", "quantity too large");
        let pending = customer
            .pending_units
            .checked_add(quantity)
            .ok_or_else(too_large)?;
        let lifetime = customer
            .lifetime_units
            .checked_add(quantity)
            .ok_or_else(too_large)?;
        customer.pending_units = pending;
        customer.lifetime_units = lifetime;
        Ok(&*customer)
    }

    /// Overwrites pending units. Lifetime is raised to at least the new value.
    pub fn replace_pending(&mut self, at: CustomerRef, new_pending: i64) -> ResultEngine<&Customer> {
        let new_pending = u64::try_from(new_pending).map_err(|_| {
            EngineError::validation("pending", format!("must be >= 0, got {new_pending}"))
        })?;
        let customer = self.get_mut(at)?;
        customer.pending_units = new_pending;
        customer.lifetime_units = customer.lifetime_units.max(new_pending);
        Ok(&*customer)
    }

    /// Edits a customer in place. Name, address and zone stay required.
    pub fn update(
        &mut self,
        zones: &mut ZoneRegistry,
        at: CustomerRef,
        update: CustomerUpdate,
    ) -> ResultEngine<&Customer> {
        self.get(at)?;
        let name = update
            .name
            .as_deref()
            .map(|v| clean_required(v, "name"))
            .transpose()?;
        let address = update
            .address
            .as_deref()
            .map(|v| clean_required(v, "address"))
            .transpose()?;
        let zone = update
            .zone
            .as_deref()
            .map(|v| clean_required(v, "zone"))
            .transpose()?;

        let zone = zone.map(|zone| zones.register(&zone));
        let customer = self.get_mut(at)?;
        if let Some(name) = name {
            customer.name = name;
        }
        if let Some(phone) = update.phone {
            customer.phone = phone.trim().to_string();
        }
        if let Some(address) = address {
            customer.address = address;
        }
        if let Some(zone) = zone {
            customer.zone = zone;
        }
        if let Some(day) = update.delivery_day {
            customer.delivery_day = clean_optional(Some(&day));
        }
        if let Some(tax_id) = update.tax_id {
            customer.tax_id = tax_id.trim().to_string();
        }
        Ok(&*customer)
    }

    /// Removes a customer. Cash movements are not linked to customers and
    /// stay untouched.
    pub fn delete(&mut self, at: CustomerRef) -> ResultEngine<Customer> {
        self.get(at)?;
        Ok(self.customers.remove(at))
    }

    /// Customers whose name or phone contains `query`, ignoring case and
    /// accents. A blank query matches nobody.
    #[must_use]
    pub fn find(&self, query: &str) -> Vec<(CustomerRef, &Customer)> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.customers
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                normalize(&c.name).contains(&needle) || normalize(&c.phone).contains(&needle)
            })
            .collect()
    }

    /// First customer whose whole name matches `name`, ignoring case and
    /// accents.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<CustomerRef> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }
        self.customers
            .iter()
            .position(|customer| normalize(&customer.name) == key)
    }

    #[must_use]
    pub fn total_pending(&self) -> u64 {
        self.customers.iter().map(|c| c.pending_units).sum()
    }
}
