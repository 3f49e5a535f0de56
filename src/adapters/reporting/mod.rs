pub mod ledger;

pub use ledger::SessionLedger;
