//! CDP page session for interacting with a single tab.

mod core;
mod input;
mod js;
mod navigation;

pub use self::core::PageSession;
