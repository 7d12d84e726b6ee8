//! HTTP page fetcher
//!
//! Performs a bounded-time GET and classifies the result. Non-2xx responses
//! and non-HTML content are outcomes, not errors, so the orchestrator can
//! apply differentiated policy to each.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Default time budget for one fetch, including reading the body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Outcome of a single fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response carrying HTML
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body
        body: String,
    },

    /// 2xx response whose Content-Type is not HTML
    NonHtml {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-2xx response
    HttpError {
        /// HTTP status code
        status_code: u16,
    },

    /// The time budget expired before a response (or body) arrived
    Timeout,

    /// Connection-level failure (refused, DNS, TLS, broken body)
    Transport {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for page fetches.
///
/// The user agent is formatted `name/version (+contact-url; contact-email)`
/// so site operators can identify and reach the crawler.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, racing the whole request against a timeout.
///
/// When the timeout fires the in-flight request future is dropped; its
/// result is discarded and the transport-level request is not guaranteed to
/// be cancelled. The attempt gets exactly one logical outcome either way.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `timeout` - Time budget covering the response and body read
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> FetchOutcome {
    match tokio::time::timeout(timeout, fetch_inner(client, url)).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => FetchOutcome::Timeout,
    }
}

async fn fetch_inner(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return FetchOutcome::NonHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        FetchOutcome::Timeout
    } else {
        FetchOutcome::Transport {
            error: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        build_http_client(&UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        });
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_success_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>hi</body></html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/page", server.uri());
        let outcome = fetch_page(&test_client(), &url, DEFAULT_FETCH_TIMEOUT).await;

        match outcome {
            FetchOutcome::Success {
                status_code, body, ..
            } => {
                assert_eq!(status_code, 200);
                assert!(body.contains("hi"));
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_html_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{}", "application/json"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/data.json", server.uri());
        let outcome = fetch_page(&test_client(), &url, DEFAULT_FETCH_TIMEOUT).await;

        match outcome {
            FetchOutcome::NonHtml { content_type } => {
                assert!(content_type.contains("application/json"));
            }
            other => panic!("expected NonHtml, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_error_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing", server.uri());
        let outcome = fetch_page(&test_client(), &url, DEFAULT_FETCH_TIMEOUT).await;

        match outcome {
            FetchOutcome::HttpError { status_code } => assert_eq!(status_code, 404),
            other => panic!("expected HttpError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .insert_header("content-type", "text/html")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let url = format!("{}/slow", server.uri());
        let outcome = fetch_page(&test_client(), &url, Duration::from_millis(50)).await;

        assert!(matches!(outcome, FetchOutcome::Timeout));
    }

    #[tokio::test]
    async fn test_transport_outcome_on_refused_connection() {
        // Port 1 is essentially never listening.
        let outcome = fetch_page(
            &test_client(),
            "http://127.0.0.1:1/",
            DEFAULT_FETCH_TIMEOUT,
        )
        .await;

        assert!(matches!(
            outcome,
            FetchOutcome::Transport { .. } | FetchOutcome::Timeout
        ));
    }
}
