//! Example: fetch a page and list its links
//!
//! Press Ctrl-C to cancel a slow download.

use hq_net::{CancellationToken, HtmlLoader, LoaderConfig};
use hq_query::{find, inner_text, select_attr};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let token = CancellationToken::new();
    let on_ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let loader = HtmlLoader::new(LoaderConfig::default())?;
    let doc = loader.load_url(&url, &token).await?;
    let tree = doc.tree();

    println!("{}", doc.title());
    for link in find(tree, doc.root(), "//a")? {
        println!(
            "  {} ({})",
            inner_text(tree, link).trim(),
            select_attr(tree, link, "href").unwrap_or("")
        );
    }
    Ok(())
}
