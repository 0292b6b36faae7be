//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::MappingRepository`]
//! trait and provide a clean API for HTTP handlers and the admin tool.
//!
//! # Available Services
//!
//! - [`services::key_generator::KeyGenerator`] - Collision-checked short key generation
//! - [`services::mapping_service::MappingService`] - Idempotent submit and resolve

pub mod services;
