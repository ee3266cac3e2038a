//! Shared infrastructure utilities for the storefront crates.
//!
//! - **`atomic_write`**: Crash-safe, owner-only file persistence (temp + rename),
//!   used by the file-backed local store that holds the persisted client cache.

pub mod atomic_write;

pub use atomic_write::atomic_write;
