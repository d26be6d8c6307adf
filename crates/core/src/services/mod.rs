pub mod metadata_service;
pub mod position_service;
