//! # Story Guardian Domain
//!
//! Domain types shared by every Story Guardian crate.
//!
//! This crate contains:
//! - The error taxonomy and `Result` alias
//! - Configuration records (credentials and sync settings)
//! - Wire-independent value types (access token, presigned URL)
//! - Fixed constants (endpoints, file names, retry defaults)
//!
//! ## Architecture
//! - No dependencies on other Story Guardian crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
