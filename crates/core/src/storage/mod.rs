pub mod ledger_store;
pub mod table;
