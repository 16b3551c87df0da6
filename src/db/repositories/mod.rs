// Repositories Module
// Re-exports all repository implementations

pub mod certificate_repository;

pub use certificate_repository::CertificateRepositoryImpl;
