//! Domain layer for the reckon decision engine
//!
//! This module contains the data shapes exchanged between decision phases,
//! the port traits implemented by external collaborators, and domain errors.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
