//! HTML loader
//!
//! Fetches a page with reqwest, decodes it with the detected charset and
//! parses the result. Every request races the caller's cancellation token.

use std::collections::HashMap;
use std::time::Duration;

use hq_dom::Document;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Proxy};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{LoaderConfig, NetError, charset};

/// Loads remote documents
#[derive(Debug, Clone)]
pub struct HtmlLoader {
    config: LoaderConfig,
    client: Client,
}

impl HtmlLoader {
    /// Create a loader; fails if the configured proxy is unusable
    pub fn new(config: LoaderConfig) -> Result<Self, NetError> {
        let client = build_client(&config, config.proxy.as_deref())?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fetch and parse `url`
    pub async fn load_url(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Document, NetError> {
        self.fetch(&self.client, url, &HashMap::new(), cancel).await
    }

    /// Fetch and parse `url`, sending extra request headers
    pub async fn load_url_with_headers(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<Document, NetError> {
        self.fetch(&self.client, url, headers, cancel).await
    }

    /// Fetch and parse `url` through `proxy`, using a dedicated client
    pub async fn load_url_with_proxy(
        &self,
        url: &str,
        proxy: &str,
        cancel: &CancellationToken,
    ) -> Result<Document, NetError> {
        let client = build_client(&self.config, Some(proxy))?;
        self.fetch(&client, url, &HashMap::new(), cancel).await
    }

    async fn fetch(
        &self,
        client: &Client,
        url: &str,
        headers: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<Document, NetError> {
        let target = parse_url(url)?;

        let mut request = client.get(target.clone());
        for (name, value) in merge_headers(&self.config.headers, headers).into_values() {
            request = request.header(name, value);
        }

        let download = async {
            let response = request.send().await?;
            let status = response.status();
            let final_url = response.url().to_string();
            if !status.is_success() {
                // the body is still parsed, error pages included
                tracing::warn!("{} answered {}", final_url, status);
            }
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let bytes = response.bytes().await?;
            Ok::<_, NetError>((final_url, charset::decode(&bytes, content_type.as_deref())))
        };

        tracing::debug!("Fetching {}", target);
        let (final_url, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Fetch of {} cancelled", target);
                return Err(NetError::Cancelled);
            }
            result = download => result?,
        };

        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
        Ok(hq_html::parse_with_url(&body, &final_url)?)
    }
}

/// Combine default and per-call headers. Names compare case-insensitively
/// and per-call values replace defaults.
fn merge_headers<'a>(
    defaults: &'a HashMap<String, String>,
    extra: &'a HashMap<String, String>,
) -> HashMap<String, (&'a str, &'a str)> {
    let mut merged = HashMap::new();
    for (name, value) in defaults.iter().chain(extra) {
        merged.insert(name.to_ascii_lowercase(), (name.as_str(), value.as_str()));
    }
    merged
}

fn parse_url(url: &str) -> Result<Url, NetError> {
    let parsed = Url::parse(url).map_err(|e| NetError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(NetError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn build_client(config: &LoaderConfig, proxy: Option<&str>) -> Result<Client, NetError> {
    let mut builder = Client::builder().user_agent(config.user_agent.as_str());
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if let Some(proxy) = proxy {
        let proxy = Proxy::all(proxy).map_err(|source| NetError::InvalidProxy {
            url: proxy.to_string(),
            source,
        })?;
        builder = builder.proxy(proxy);
    }
    builder.build().map_err(NetError::Transport)
}
