//! Inventory domain module (event-sourced).
//!
//! Per-category stock counts for a single shop, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod category;
pub mod ledger;

pub use category::Category;
pub use ledger::{
    AddStock, InventoryCommand, InventoryEvent, InventoryLedger, LedgerSnapshot, RemoveStock,
    StockAdded, StockRemoved,
};
