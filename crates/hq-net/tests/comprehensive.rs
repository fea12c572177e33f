//! Comprehensive tests for hq-net
//!
//! Every request goes to a local wiremock server.

use std::collections::HashMap;
use std::time::Duration;

use hq_net::{CancellationToken, HtmlLoader, LoaderConfig, NetError};
use hq_query::{find, find_one, inner_text};
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "<html><head><title>Mock</title></head>\
                    <body><ul><li>A</li><li>B</li><li>C</li></ul></body></html>";

fn loader() -> HtmlLoader {
    HtmlLoader::new(LoaderConfig::default()).unwrap()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_load_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(PAGE))
        .mount(&server)
        .await;

    let url = format!("{}/page", server.uri());
    let doc = loader()
        .load_url(&url, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(doc.title(), "Mock");
    assert_eq!(doc.url(), url);
    assert_eq!(find(doc.tree(), doc.root(), "//li").unwrap().len(), 3);
}

#[tokio::test]
async fn test_convenience_function() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(PAGE))
        .mount(&server)
        .await;

    let doc = hq_net::load_url(&server.uri(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(doc.title(), "Mock");
}

#[tokio::test]
async fn test_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-token", "secret"))
        .and(header("accept-language", "fr"))
        .and(header("user-agent", "hq-test/1.0"))
        .respond_with(html("<p>authorized</p>"))
        .mount(&server)
        .await;

    let config = LoaderConfig {
        user_agent: "hq-test/1.0".into(),
        headers: HashMap::from([("Accept-Language".to_string(), "fr".to_string())]),
        ..Default::default()
    };
    let loader = HtmlLoader::new(config).unwrap();
    let headers = HashMap::from([("X-Token".to_string(), "secret".to_string())]);

    let doc = loader
        .load_url_with_headers(&server.uri(), &headers, &CancellationToken::new())
        .await
        .unwrap();
    let p = find_one(doc.tree(), doc.root(), "//p").unwrap().unwrap();
    assert_eq!(inner_text(doc.tree(), p), "authorized");
}

#[tokio::test]
async fn test_error_status_still_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not Found</h1>"))
        .mount(&server)
        .await;

    let doc = loader()
        .load_url(&server.uri(), &CancellationToken::new())
        .await
        .unwrap();
    let h1 = find_one(doc.tree(), doc.root(), "//h1").unwrap().unwrap();
    assert_eq!(inner_text(doc.tree(), h1), "Not Found");
}

#[tokio::test]
async fn test_charset_from_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>caf\xe9</p>".to_vec(), "text/html; charset=iso-8859-1"),
        )
        .mount(&server)
        .await;

    let doc = loader()
        .load_url(&server.uri(), &CancellationToken::new())
        .await
        .unwrap();
    let p = find_one(doc.tree(), doc.root(), "//p").unwrap().unwrap();
    assert_eq!(inner_text(doc.tree(), p), "café");
}

#[tokio::test]
async fn test_charset_from_meta() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>".to_vec(),
            "text/html",
        ))
        .mount(&server)
        .await;

    let doc = loader()
        .load_url(&server.uri(), &CancellationToken::new())
        .await
        .unwrap();
    let p = find_one(doc.tree(), doc.root(), "//p").unwrap().unwrap();
    assert_eq!(inner_text(doc.tree(), p), "caf\u{e9}");
}

#[tokio::test]
async fn test_per_call_header_replaces_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<p>ok</p>"))
        .mount(&server)
        .await;

    let config = LoaderConfig {
        headers: HashMap::from([("X-Mode".to_string(), "default".to_string())]),
        ..Default::default()
    };
    let headers = HashMap::from([("x-mode".to_string(), "call".to_string())]);
    HtmlLoader::new(config)
        .unwrap()
        .load_url_with_headers(&server.uri(), &headers, &CancellationToken::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let values: Vec<_> = requests[0]
        .headers
        .get_all("x-mode")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["call"]);
}

#[tokio::test]
async fn test_cancel_mid_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(PAGE).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = loader().load_url(&server.uri(), &token).await;
    assert!(matches!(result, Err(NetError::Cancelled)));
}

#[tokio::test]
async fn test_already_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let result = loader().load_url(&server.uri(), &token).await;
    assert!(matches!(result, Err(NetError::Cancelled)));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(PAGE).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let config = LoaderConfig {
        timeout_ms: 200,
        ..Default::default()
    };
    let result = HtmlLoader::new(config)
        .unwrap()
        .load_url(&server.uri(), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(NetError::Timeout(_))));
}

#[tokio::test]
async fn test_load_through_proxy() {
    let proxy = MockServer::start().await;
    Mock::given(any())
        .respond_with(html("<p>via proxy</p>"))
        .mount(&proxy)
        .await;

    let doc = loader()
        .load_url_with_proxy(
            "http://upstream.invalid/page",
            &proxy.uri(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    let p = find_one(doc.tree(), doc.root(), "//p").unwrap().unwrap();
    assert_eq!(inner_text(doc.tree(), p), "via proxy");
}

#[tokio::test]
async fn test_invalid_inputs() {
    let loader = loader();
    let token = CancellationToken::new();

    assert!(matches!(
        loader.load_url("::not a url::", &token).await,
        Err(NetError::InvalidUrl { .. })
    ));
    assert!(matches!(
        loader
            .load_url_with_proxy("http://example.com", "http://proxy.invalid:99999", &token)
            .await,
        Err(NetError::InvalidProxy { .. })
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // grab a free port, then close it again
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let uri = format!("http://127.0.0.1:{port}/");
    let result = loader().load_url(&uri, &CancellationToken::new()).await;
    assert!(matches!(result, Err(NetError::Transport(_))));
}
