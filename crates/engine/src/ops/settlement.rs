use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::{
    ResultEngine, Settlement, SettlementFilter, SettlementOutcome, export,
    settlement::{commit, prepare},
};

use super::Engine;

/// What happened to a delivery run after its sheet was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The operator confirmed; pending units of `customers` were reset.
    Committed { path: PathBuf, customers: usize },
    /// The sheet exists but pending units were left untouched.
    Declined { path: PathBuf },
}

impl Engine {
    /// Selects and prices the customers of a delivery run. Nothing changes.
    pub fn prepare_settlement(&self, filter: &SettlementFilter) -> ResultEngine<SettlementOutcome> {
        prepare(self.customers.all(), &self.zones, filter)
    }

    /// Writes the sheet of `settlement` into `dir` and returns its path.
    pub fn export_settlement(
        &self,
        settlement: &Settlement,
        dir: &Path,
        date: NaiveDate,
    ) -> ResultEngine<PathBuf> {
        let path = dir.join(export::file_name(settlement.zone.as_deref(), date));
        export::write(&path, settlement)?;
        Ok(path)
    }

    /// Marks the run as delivered: zeroes pending units and persists.
    pub fn commit_settlement(&mut self, settlement: &Settlement) -> ResultEngine<usize> {
        let reset = commit(settlement, &mut self.customers);
        tracing::info!(
            customers = reset,
            units = settlement.total_units,
            amount = settlement.total_amount,
            "committed delivery run"
        );
        self.save_customers()?;
        Ok(reset)
    }

    /// Exports the run, then asks `confirm` with the sheet path and commits
    /// only on `true`. A failed export returns the error and resets nothing.
    pub fn deliver(
        &mut self,
        settlement: &Settlement,
        dir: &Path,
        date: NaiveDate,
        confirm: impl FnOnce(&Path) -> bool,
    ) -> ResultEngine<Delivery> {
        let path = self.export_settlement(settlement, dir, date)?;
        if !confirm(&path) {
            tracing::warn!(path = %path.display(), "delivery run exported but not confirmed");
            return Ok(Delivery::Declined { path });
        }
        let customers = self.commit_settlement(settlement)?;
        Ok(Delivery::Committed { path, customers })
    }
}
