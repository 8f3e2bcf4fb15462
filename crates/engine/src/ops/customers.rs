use crate::{Customer, CustomerRef, CustomerUpdate, NewCustomer, ResultEngine};

use super::Engine;

impl Engine {
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        self.customers.all()
    }

    pub fn customer(&self, at: CustomerRef) -> ResultEngine<&Customer> {
        self.customers.get(at)
    }

    /// Creates a customer with no pending units and persists it.
    pub fn add_customer(&mut self, new: NewCustomer<'_>) -> ResultEngine<CustomerRef> {
        let at = self.customers.add(&mut self.zones, new)?;
        tracing::info!(customer = at, name = %self.customers.all()[at].name, "added customer");
        self.save_customers()?;
        Ok(at)
    }

    /// Order intake: adds `quantity` to pending and lifetime units.
    pub fn place_order(&mut self, at: CustomerRef, quantity: i64) -> ResultEngine<&Customer> {
        let customer = self.customers.place_order(at, quantity)?;
        tracing::info!(
            customer = at,
            quantity,
            pending = customer.pending_units,
            "placed order"
        );
        self.save_customers()?;
        self.customers.get(at)
    }

    pub fn replace_pending(&mut self, at: CustomerRef, new_pending: i64) -> ResultEngine<&Customer> {
        let customer = self.customers.replace_pending(at, new_pending)?;
        tracing::info!(
            customer = at,
            pending = customer.pending_units,
            lifetime = customer.lifetime_units,
            "replaced pending units"
        );
        self.save_customers()?;
        self.customers.get(at)
    }

    pub fn update_customer(
        &mut self,
        at: CustomerRef,
        update: CustomerUpdate,
    ) -> ResultEngine<&Customer> {
        self.customers.update(&mut self.zones, at, update)?;
        tracing::debug!(customer = at, "updated customer");
        self.save_customers()?;
        self.customers.get(at)
    }

    pub fn delete_customer(&mut self, at: CustomerRef) -> ResultEngine<Customer> {
        let removed = self.customers.delete(at)?;
        tracing::info!(customer = at, name = %removed.name, "deleted customer");
        self.save_customers()?;
        Ok(removed)
    }

    /// Search by name or phone. A blank query returns nothing.
    #[must_use]
    pub fn find_customers(&self, query: &str) -> Vec<(CustomerRef, &Customer)> {
        self.customers.find(query)
    }

    #[must_use]
    pub fn find_customer_by_name(&self, name: &str) -> Option<CustomerRef> {
        self.customers.find_by_name(name)
    }

    #[must_use]
    pub fn total_pending(&self) -> u64 {
        self.customers.total_pending()
    }
}
