//! File-backed persistence

mod form_repository;

pub use form_repository::FileFormRepository;
