//! Core types and trait definitions for the amparo case-record store.
//!
//! This crate is deliberately free of database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod case;
pub mod error;
pub mod followup;
pub mod kinship;
pub mod person;
pub mod store;

pub use error::{Error, Result};
