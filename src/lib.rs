pub use error::AppError;

/// Client surface (dependency flow: CLI → endpoints → transport)
pub mod client; // Top-level Square client and environment selection
pub mod endpoints; // Per-resource endpoint groups
pub mod http; // Transport adapter and route building

/// Data layer
pub mod models; // Typed resources hydrated from wire JSON
pub mod pagination; // Cursor-following page streams
pub mod query; // Customer search query builder

/// Support modules (used across layers)
pub mod cli; // Command-line interface
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod storage; // Configuration and credential persistence
pub mod utils; // Shared utilities and helpers

pub use client::{Environment, SquareClient};

pub type Result<T> = std::result::Result<T, AppError>;
