//! # framefeed browser
//!
//! Drives a Chrome tab over the Chrome DevTools Protocol.
//!
//! - [`cdp`]: WebSocket JSON-RPC client and per-tab sessions
//! - [`manager`]: finds or launches Chrome and opens the target tab
//! - [`Page`]: the element-level surface the import agent works against,
//!   implemented over CDP by [`CdpPage`]

pub mod cdp;
pub mod cdp_page;
pub mod manager;
pub mod page;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use cdp_page::CdpPage;
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use page::{ElementHandle, FileUpload, Page, PageError, SyntheticEvent};
