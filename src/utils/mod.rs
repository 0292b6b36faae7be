//! Helpers shared by the service and HTTP layers.

pub mod key_source;
pub mod validation;
