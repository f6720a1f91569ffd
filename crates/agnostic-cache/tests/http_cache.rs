//! Cached pages served through a router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agnostic_cache::{CacheError, CacheOptions, FetchResponse, HttpResponseCacher, ManualClock};
use agnostic_router::{Request, Response, Router};

const MAX_AGE: Duration = Duration::from_secs(10);

struct Site {
    router: Router,
    renders: Arc<AtomicUsize>,
    clock: ManualClock,
}

fn site() -> Site {
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&renders);
    let clock = ManualClock::new();
    let pages: Arc<HttpResponseCacher<CacheError>> = Arc::new(
        HttpResponseCacher::new(
            move |key: &str, _previous| {
                let version = counter.fetch_add(1, Ordering::SeqCst);
                let body = format!("{key} v{version}");
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok(FetchResponse::hashed(body))
                }
            },
            CacheOptions::new(MAX_AGE),
        )
        .with_clock(clock.clone()),
    );

    let router = Router::new().get("/pages/{name}", move |req, res| {
        let pages = Arc::clone(&pages);
        Box::pin(async move {
            let key = req.params.require("name")?.to_string();
            pages.fetch_and_serve(req, res, &key, None).await?;
            Ok(())
        })
    });

    Site {
        router,
        renders,
        clock,
    }
}

async fn get(router: &Router, req: Request) -> Response {
    router.respond(req).await
}

#[tokio::test]
async fn pages_are_rendered_once_per_window() {
    let site = site();

    let first = get(&site.router, Request::get("/pages/home")).await;
    assert_eq!(first.status_code, 200);
    assert_eq!(first.body, "home v0");
    assert_eq!(first.get_header("x-internal-cache-hit"), Some("MISS"));

    let second = get(&site.router, Request::get("/pages/home")).await;
    assert_eq!(second.body, "home v0");
    assert_eq!(second.get_header("x-internal-cache-hit"), Some("HIT"));
    assert_eq!(site.renders.load(Ordering::SeqCst), 1);

    site.clock.advance(MAX_AGE);

    let third = get(&site.router, Request::get("/pages/home")).await;
    assert_eq!(third.body, "home v1");
    assert_eq!(third.get_header("x-internal-cache-hit"), Some("MISS"));
}

#[tokio::test]
async fn revalidation_with_etag_returns_304() {
    let site = site();

    let first = get(&site.router, Request::get("/pages/about")).await;
    let etag = first
        .get_header("etag")
        .map(str::to_string)
        .unwrap_or_else(|| panic!("missing etag"));

    let revalidated = get(
        &site.router,
        Request::get("/pages/about").header("if-none-match", etag),
    )
    .await;
    assert_eq!(revalidated.status_code, 304);
    assert!(revalidated.ended);
    assert!(revalidated.body.is_empty());

    let stale = get(
        &site.router,
        Request::get("/pages/about").header("if-none-match", "\"other\""),
    )
    .await;
    assert_eq!(stale.status_code, 200);
    assert_eq!(stale.body, "about v0");
}

#[tokio::test]
async fn concurrent_requests_share_a_render() {
    let site = site();
    let router = Arc::new(site.router);

    let requests: Vec<_> = (0..5)
        .map(|_| {
            let router = Arc::clone(&router);
            tokio::spawn(async move { router.respond(Request::get("/pages/news")).await })
        })
        .collect();

    for request in requests {
        let res = request.await.unwrap();
        assert_eq!(res.body, "news v0");
    }
    assert_eq!(site.renders.load(Ordering::SeqCst), 1);
}
