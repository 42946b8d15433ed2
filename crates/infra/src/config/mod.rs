//! Configuration loading
//!
//! Credentials and toggles come from environment variables, optionally
//! seeded from a `.env` file.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_dotenv, load_from_env, upload_enabled_from_env, var_name};
