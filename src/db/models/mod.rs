// Database Models Module
// Re-exports all database model types

pub mod certificate;

pub use certificate::ExpiringCertificate;
