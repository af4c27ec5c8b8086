//! Shared library for the schedule overrides Lambda.
//!
//! This crate provides the override record model, the blob store capability
//! and the service that implements list/get/upsert/delete on top of it.

pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod http;
pub mod models;
pub mod overrides;
pub mod s3;
pub mod secrets;
pub mod store;

pub use auth::{authorize_admin, presented_admin_key, ADMIN_KEY_HEADER};
pub use config::{Config, StoreBackend};
pub use error::{Error, Result};
pub use models::{OverrideRecord, UpsertRequest};
pub use overrides::OverrideService;
pub use s3::S3Store;
pub use secrets::{fetch_admin_key, get_secret};
pub use store::{BlobStore, MemoryStore};
