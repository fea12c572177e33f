//! htmlquery networking
//!
//! Fetches HTML over HTTP(S) and hands the decoded body to the HTML
//! parser. Requests are cancelled through a `CancellationToken`.

mod charset;
mod config;
mod error;
mod loader;

pub use config::LoaderConfig;
pub use error::NetError;
pub use loader::HtmlLoader;
pub use tokio_util::sync::CancellationToken;

use hq_dom::Document;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fetch and parse `url` with the default configuration
pub async fn load_url(url: &str, cancel: &CancellationToken) -> Result<Document, NetError> {
    HtmlLoader::new(LoaderConfig::default())?
        .load_url(url, cancel)
        .await
}
