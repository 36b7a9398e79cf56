use std::time::Duration;

use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use page_digest::scraper::{PageFetcher, ScrapeError, NO_CONTENT_MESSAGE};

#[tokio::test]
async fn fetches_with_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header_regex("user-agent", r"AppleWebKit/537\.36|Chrome/91\.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>t</title></head><body>\
             <header>Top</header><h2>News</h2><p>Hello, world!</p>\
             <footer><p>Bottom</p></footer></body></html>",
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new().unwrap();
    let text = fetcher.scrape(&format!("{}/page", server.uri())).await.unwrap();

    assert_eq!(text.as_str(), "News Hello, world!");
}

#[tokio::test]
async fn error_status_is_a_scrape_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new().unwrap();
    let err = fetcher.scrape(&server.uri()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Error scraping website: "), "{message}");
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn invalid_url_is_a_scrape_error() {
    let fetcher = PageFetcher::new().unwrap();
    let err = fetcher.scrape("notaurl").await.unwrap_err();
    assert!(err.to_string().starts_with("Error scraping website: "));
}

#[tokio::test]
async fn page_without_text_elements_yields_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><div>layout only</div></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new().unwrap();
    let text = fetcher.scrape(&server.uri()).await.unwrap();

    assert_eq!(text.as_str(), NO_CONTENT_MESSAGE);
}

#[tokio::test]
async fn slow_page_hits_fetch_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher = PageFetcher::with_timeout(Duration::from_millis(200)).unwrap();
    let err = fetcher.scrape(&server.uri()).await.unwrap_err();

    let ScrapeError::Request(source) = &err;
    assert!(source.is_timeout());
    assert!(err.to_string().starts_with("Error scraping website: "));
}
