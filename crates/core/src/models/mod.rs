pub mod ledger;
pub mod metadata;
pub mod price;
pub mod settings;
