//! Business logic services for the application layer.

pub mod key_generator;
pub mod mapping_service;

pub use key_generator::KeyGenerator;
pub use mapping_service::MappingService;
