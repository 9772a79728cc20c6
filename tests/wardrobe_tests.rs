
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use sneaker_stylist::routes::configure_routes;
use test_utils::*;
use uuid::Uuid;

#[actix_web::test]
async fn list_returns_newest_first_for_one_user() {
    let fakes = Fakes::default();
    {
        let mut items = fakes.wardrobe.items.lock().unwrap();
        items.push(wardrobe_item("user-42", "jeans", 60));
        items.push(wardrobe_item("user-42", "jacket", 1));
        items.push(wardrobe_item("someone-else", "scarf", 0));
    }

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(fakes.app_state(false)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/wardrobe?userId=user-42")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["item_type"], "jacket");
    assert_eq!(items[1]["item_type"], "jeans");
}

#[actix_web::test]
async fn list_without_user_id_is_bad_request() {
    let fakes = Fakes::default();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(fakes.app_state(false)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/wardrobe").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "userId is required" }));
}

#[actix_web::test]
async fn create_then_delete_round_trip() {
    let fakes = Fakes::default();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(fakes.app_state(false)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/wardrobe")
        .set_json(json!({
            "userId": "user-42",
            "item_type": "Chinos",
            "color": "beige",
            "description": "slim fit"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["user_id"], "user-42");
    assert_eq!(created["item_type"], "chinos");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let req = test::TestRequest::delete()
        .uri("/api/wardrobe")
        .set_json(json!({ "id": id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));
    assert!(fakes.wardrobe.items.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn create_with_missing_fields_is_bad_request() {
    let fakes = Fakes::default();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(fakes.app_state(false)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/wardrobe")
        .set_json(json!({ "userId": "user-42", "item_type": "boots" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert!(fakes.wardrobe.items.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn delete_requires_an_id() {
    let fakes = Fakes::default();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(fakes.app_state(false)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri("/api/wardrobe")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/wardrobe")
        .set_json(json!({ "id": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn database_errors_are_not_leaked() {
    let fakes = Fakes {
        wardrobe: Arc::new(InMemoryWardrobe { unavailable: true, ..Default::default() }),
        ..Default::default()
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(fakes.app_state(true)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/wardrobe?userId=user-42")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
}
