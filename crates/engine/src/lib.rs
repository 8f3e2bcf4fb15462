//! Delivery book engine.
//!
//! Tracks recurring customers of a delivery round: what each one has pending,
//! the unit price of every zone, the delivery runs that settle pending units
//! and a manual cash ledger. Everything lives in one JSON document, see
//! [`DocumentStore`].
//!
//! [`Engine`] is the entry point: it owns the in-memory state and persists
//! it after every mutating operation.

pub use cash::{CashLedger, CashMovement, CashTotals, MovementCategory};
pub use customers::{Customer, CustomerLedger, CustomerRef, CustomerUpdate, NewCustomer};
pub use error::EngineError;
pub use money::{Money, format_amount};
pub use ops::{Delivery, Engine, EngineBuilder};
pub use settlement::{Settlement, SettlementFilter, SettlementOutcome, SettlementRow};
pub use store::{DEFAULT_DATA_FILE, Document, DocumentPatch, DocumentStore, Loaded};
pub use zones::{DEFAULT_UNIT_PRICE, ZoneRegistry};

mod cash;
mod customers;
mod error;
pub mod export;
mod money;
mod ops;
pub mod settlement;
mod store;
pub mod text;
mod zones;

type ResultEngine<T> = Result<T, EngineError>;
