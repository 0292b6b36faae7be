//! Domain layer: entities, the short key type, and the storage contract.
//!
//! - [`entities`] - Mapping data structures
//! - [`short_key`] - Validated 5-letter short keys
//! - [`repositories`] - The [`repositories::MappingRepository`] trait
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; business flow lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
pub mod short_key;

pub use short_key::{ALPHABET, KEY_LENGTH, ShortKey};
