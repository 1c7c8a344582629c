//! Browser instance manager.
//!
//! Connects to Chrome on the debugging port, launching it with a persistent
//! profile when nothing is listening so the target site's login survives.

mod manager_core;
mod manager_pages;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
