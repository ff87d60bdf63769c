//! End-to-end resource tests over a scripted transport.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{ListPostsQuery, ListQuery, Sort};
use crate::client::Client;
use crate::error::Error;
use crate::paginate::PageOptions;
use crate::time::InstantSleeper;
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// Mock transport returning a scripted sequence of responses.
#[derive(Debug)]
struct ScriptedTransport {
    responses: Mutex<Vec<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl ScriptedTransport {
    fn new(bodies: Vec<serde_json::Value>) -> Arc<Self> {
        let responses = bodies
            .into_iter()
            .map(|body| {
                Ok(HttpResponse::new(
                    http::StatusCode::OK,
                    http::HeaderMap::new(),
                    serde_json::to_vec(&body).unwrap(),
                ))
            })
            .collect();
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        })
    }

    fn with_status(status: http::StatusCode, body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(vec![Ok(HttpResponse::new(
                status,
                http::HeaderMap::new(),
                serde_json::to_vec(&body).unwrap(),
            ))]),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_urls(&self) -> Vec<url::Url> {
        self.requests.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }
}

impl Transport for Arc<ScriptedTransport> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

fn client(transport: Arc<ScriptedTransport>) -> Client<Arc<ScriptedTransport>, InstantSleeper> {
    Client::builder("https://api.test.example/v1")
        .with_api_key("test-key")
        .with_transport(transport)
        .with_sleeper(InstantSleeper)
        .build()
        .unwrap()
}

fn post_body(slug: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{slug}"),
        "slug": slug,
        "title": "Hello, world",
        "content": "<p>hi</p>",
        "description": "greeting",
        "publishedAt": "2024-05-01T12:00:00Z",
        "authors": [{"id": "a1", "name": "Ada"}],
        "tags": [{"id": "t1", "name": "Intro", "slug": "intro"}]
    })
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn returns_typed_posts_with_pagination() {
        let transport = ScriptedTransport::new(vec![json!({
            "posts": [post_body("hello-world")],
            "pagination": {
                "limit": 10,
                "currentPage": 1,
                "nextPage": null,
                "previousPage": null,
                "totalItems": 1,
                "totalPages": 1
            }
        })]);
        let client = client(transport.clone());

        let page = client
            .posts()
            .list(&ListPostsQuery::new().with_limit(10))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        let post = &page.items[0];
        assert_eq!(post.slug, "hello-world");
        assert_eq!(
            post.published_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );
        // updatedAt absent on the wire falls back to publishedAt.
        assert_eq!(post.updated_at, post.published_at);
        assert_eq!(post.authors[0].name, "Ada");
        assert_eq!(page.pagination.next_page, None);
        assert_eq!(page.pagination.total_items, 1);

        let urls = transport.captured_urls();
        assert_eq!(urls[0].path(), "/v1/posts");
        assert_eq!(urls[0].query(), Some("limit=10"));
    }

    #[tokio::test]
    async fn resource_key_wins_over_data_key() {
        let transport = ScriptedTransport::new(vec![json!({
            "posts": [post_body("from-posts")],
            "data": [post_body("from-data")]
        })]);
        let client = client(transport.clone());

        let page = client.posts().list(&ListPostsQuery::new()).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].slug, "from-posts");
    }

    #[tokio::test]
    async fn filters_reach_the_wire() {
        let transport = ScriptedTransport::new(vec![json!({"posts": []})]);
        let client = client(transport.clone());
        let query = ListPostsQuery::new()
            .with_tag("intro")
            .with_tag("rust")
            .with_sort(Sort::PublishedAtDesc);

        client.posts().list(&query).await.unwrap();

        let urls = transport.captured_urls();
        assert_eq!(urls[0].query(), Some("tags=intro%2Crust&sort=-publishedAt"));
    }

    #[tokio::test]
    async fn tags_handle_unwraps_its_own_envelope() {
        let transport = ScriptedTransport::new(vec![json!({
            "tags": [{"id": "t1", "name": "Intro", "slug": "intro"}]
        })]);
        let client = client(transport.clone());

        let page = client.tags().list(&ListQuery::new()).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].slug, "intro");
        assert_eq!(transport.captured_urls()[0].path(), "/v1/tags");
    }
}

mod get_by_id {
    use super::*;

    #[tokio::test]
    async fn unwraps_singular_envelope() {
        let transport = ScriptedTransport::new(vec![json!({
            "post": post_body("hello-world")
        })]);
        let client = client(transport.clone());

        let post = client.posts().get("hello-world").await.unwrap();

        assert_eq!(post.slug, "hello-world");
        assert_eq!(transport.captured_urls()[0].path(), "/v1/posts/hello-world");
    }

    #[tokio::test]
    async fn missing_post_surfaces_http_error() {
        let transport = ScriptedTransport::with_status(
            http::StatusCode::NOT_FOUND,
            json!({"error": "post not found"}),
        );
        let client = client(transport.clone());

        let err = client.posts().get("nope").await.unwrap_err();

        match err {
            Error::Http { status, body, .. } => {
                assert_eq!(status, http::StatusCode::NOT_FOUND);
                assert_eq!(body.unwrap()["error"], "post not found");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
    }
}

mod traversal {
    use super::*;

    fn page_body(slugs: &[&str], current: u32, next: Option<u32>) -> serde_json::Value {
        json!({
            "posts": slugs.iter().map(|s| post_body(s)).collect::<Vec<_>>(),
            "pagination": {
                "limit": 2,
                "currentPage": current,
                "nextPage": next,
                "previousPage": if current > 1 { json!(current - 1) } else { json!(null) },
                "totalItems": 3,
                "totalPages": 2
            }
        })
    }

    #[tokio::test]
    async fn pages_stop_at_terminal_cursor() {
        let transport = ScriptedTransport::new(vec![
            page_body(&["one", "two"], 1, Some(2)),
            page_body(&["three"], 2, None),
        ]);
        let client = client(transport.clone());
        let mut pages = client
            .posts()
            .pages(&ListPostsQuery::new(), PageOptions::new().with_page_size(2));

        let first = pages.fetch_next().await.unwrap().unwrap();
        assert_eq!(first.items.len(), 2);
        let second = pages.fetch_next().await.unwrap().unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(pages.fetch_next().await.is_none());

        // The terminal cursor stops traversal without a probe request.
        assert_eq!(transport.calls(), 2);

        let urls = transport.captured_urls();
        assert_eq!(urls[0].query(), Some("page=1&limit=2"));
        assert_eq!(urls[1].query(), Some("page=2&limit=2"));
    }

    #[tokio::test]
    async fn pages_use_the_resource_default_page_size() {
        let transport = ScriptedTransport::new(vec![json!({
            "posts": [],
            "pagination": {"limit": 20, "currentPage": 1, "nextPage": null,
                           "previousPage": null, "totalItems": 0, "totalPages": 1}
        })]);
        let client = client(transport.clone());
        let mut pages = client.posts().pages(&ListPostsQuery::new(), PageOptions::new());

        pages.fetch_next().await.unwrap().unwrap();

        assert_eq!(
            transport.captured_urls()[0].query(),
            Some("page=1&limit=20")
        );
    }

    #[tokio::test]
    async fn items_flatten_pages_in_order() {
        let transport = ScriptedTransport::new(vec![
            page_body(&["one", "two"], 1, Some(2)),
            page_body(&["three"], 2, None),
        ]);
        let client = client(transport.clone());
        let mut items = client
            .posts()
            .items(&ListPostsQuery::new(), PageOptions::new().with_page_size(2));

        let mut slugs = Vec::new();
        while let Some(post) = items.fetch_next().await {
            slugs.push(post.unwrap().slug);
        }

        assert_eq!(slugs, vec!["one", "two", "three"]);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn traversal_carries_query_filters_on_every_page() {
        let transport = ScriptedTransport::new(vec![
            page_body(&["one"], 1, Some(2)),
            page_body(&["two"], 2, None),
        ]);
        let client = client(transport.clone());
        let query = ListPostsQuery::new().with_category("news");
        let mut pages = client
            .posts()
            .pages(&query, PageOptions::new().with_page_size(1));

        while let Some(page) = pages.fetch_next().await {
            page.unwrap();
        }

        for url in transport.captured_urls() {
            assert!(url.query().unwrap().starts_with("category=news&"));
        }
    }
}
