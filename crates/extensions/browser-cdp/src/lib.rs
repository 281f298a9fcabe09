//! # personafill Browser (CDP)
//!
//! Live [`FormPage`](personafill_protocols::FormPage) backed by a running
//! Chrome/Chromium through the Chrome DevTools Protocol.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Attach and fill:
//!    ```rust,ignore
//!    let page = CdpFormPage::connect(&config.browser).await?;
//!    let report = engine.fill(&page, &profile).await;
//!    ```

mod client;
mod error;
mod page;
mod protocol;
mod scripts;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::CdpFormPage;
pub use protocol::*;
pub use session::PageSession;
