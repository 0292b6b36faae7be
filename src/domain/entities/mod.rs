//! Core domain entities.
//!
//! - [`Mapping`] - A stored (long URL, short key) pair
//! - [`NewMapping`] - Input for inserting a mapping
//! - [`Claim`] - Result of the atomic check-and-insert

pub mod mapping;

pub use mapping::{Claim, Mapping, NewMapping};
