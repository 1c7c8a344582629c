//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome via the `/json/version` endpoint and talks JSON-RPC
//! over one browser WebSocket. Each attached tab gets a [`PageSession`]
//! multiplexed on that socket with a flat session id.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page(Some("https://example.com")).await?;
//! page.reload().await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
