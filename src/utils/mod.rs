pub mod jwt;
pub mod random;
pub mod tracing;
pub mod upload;
pub mod validation;
