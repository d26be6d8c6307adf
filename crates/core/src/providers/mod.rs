pub mod traits;

// External collaborator implementations
pub mod frankfurter;
pub mod yahoo_finance;
