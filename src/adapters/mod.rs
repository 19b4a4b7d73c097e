//! Storage adapters for the strata persistence adapter.

pub mod cache;
pub mod sqlite;
