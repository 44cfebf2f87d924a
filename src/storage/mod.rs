//! Configuration and credential persistence.
//!
//! TOML profiles under the platform config directory, access tokens in the
//! OS keyring.

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
