// Domain module - Configuration records and error taxonomy
pub mod config;
pub mod error;
