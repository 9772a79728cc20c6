
use std::{
    net::TcpListener,
    sync::{atomic::Ordering, Arc},
    time::Duration,
};

use actix_web::{web, App, HttpServer};
use serde_json::Value;
use sneaker_stylist::{entities::trend::TrendItem, routes::configure_routes};
use test_utils::*;

#[actix_web::test]
async fn refresh_started_by_a_request_survives_server_stop() {
    let fakes = Fakes {
        scraper: Arc::new(FakeScraper {
            items: vec![TrendItem {
                image_url: "https://i.pinimg.com/736x/cargo.jpg".to_string(),
                title: "cargo".to_string(),
                source: "pinterest".to_string(),
            }],
            delay: Duration::from_millis(300),
            ..Default::default()
        }),
        ..Default::default()
    };
    // Zero TTL: every read after the first is stale and triggers a refresh.
    let state = web::Data::new(fakes.app_state_with_ttl(false, Duration::ZERO));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new({
        let state = state.clone();
        move || App::new().app_data(state.clone()).configure(configure_routes)
    })
    .workers(1)
    .shutdown_timeout(1)
    .disable_signals()
    .listen(listener)
    .unwrap()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    let url = format!("http://{addr}/api/trends?brand=Nike&model=Dunk");

    for _ in 0..2 {
        let body: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
        assert_eq!(body[0]["title"], "Nike Dunk: cargo");
    }
    assert_eq!(state.trend_cache.stats().refreshes_in_flight, 1);

    handle.stop(true).await;
    state.trend_cache.shutdown(Duration::from_secs(5)).await;

    assert_eq!(fakes.scraper.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fakes.scraper.completed.load(Ordering::SeqCst), 2);
    assert_eq!(state.trend_cache.stats().refreshes_in_flight, 0);
}
