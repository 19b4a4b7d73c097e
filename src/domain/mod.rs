//! Domain layer for the strata persistence adapter.
//!
//! This module contains the item/field data model, its resolution rules,
//! and the ports infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
