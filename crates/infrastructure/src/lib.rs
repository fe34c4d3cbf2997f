//! Officiant Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::SystemClock;
pub use config::{AppConfig, ConfigError, load_config};
pub use persistence::FileFormRepository;
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
