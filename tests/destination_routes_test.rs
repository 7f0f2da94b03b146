use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

mod common;

fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|d| d["id"].as_str().expect("string id").to_string())
        .collect()
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(common::create_app()).await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_unfiltered_list_is_whole_catalog_in_order() {
    let (status, body) = get_json("/api/destinations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert_eq!(body[0]["name"], "Santorini");
    assert_eq!(body[0]["price"], 120.0);
    assert_eq!(body[0]["categories"], json!(["Island", "Romantic", "Beach"]));
}

#[actix_web::test]
async fn test_search_is_case_insensitive() {
    let (status, body) = get_json("/api/destinations?q=TEMPLE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["2", "4"]);
}

#[actix_web::test]
async fn test_regions_and_max_budget() {
    let (_, body) = get_json("/api/destinations?regions=Asia,Europe&max_price=110").await;
    assert_eq!(ids(&body), vec!["2", "4"]);
}

#[actix_web::test]
async fn test_category_with_sort() {
    let (_, body) =
        get_json("/api/destinations?categories=Beach&sort=price&direction=desc").await;
    assert_eq!(ids(&body), vec!["8", "1", "4"]);
}

#[actix_web::test]
async fn test_crossed_price_bounds_are_swapped() {
    let (_, crossed) = get_json("/api/destinations?min_price=150&max_price=100").await;
    let (_, ordered) = get_json("/api/destinations?min_price=100&max_price=150").await;
    assert_eq!(crossed, ordered);
    assert_eq!(ids(&crossed), vec!["1", "2", "6", "7", "8"]);
}

#[actix_web::test]
async fn test_no_matches_is_empty_success() {
    let (status, body) = get_json("/api/destinations?min_rating=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_unknown_sort_field_is_rejected() {
    let app = test::init_service(common::create_app()).await;
    let req = test::TestRequest::get()
        .uri("/api/destinations?sort=popularity")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_search_body() {
    let app = test::init_service(common::create_app()).await;
    let req = test::TestRequest::post()
        .uri("/api/destinations/search")
        .set_json(json!({
            "searchQuery": "santo",
            "priceRange": [100, 200],
            "minRating": 4
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(ids(&body), vec!["1"]);
}

#[actix_web::test]
async fn test_empty_search_body_is_identity() {
    let app = test::init_service(common::create_app()).await;
    let req = test::TestRequest::post()
        .uri("/api/destinations/search")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 8);
}

#[actix_web::test]
async fn test_search_body_of_wrong_shape_is_rejected() {
    let app = test::init_service(common::create_app()).await;
    let req = test::TestRequest::post()
        .uri("/api/destinations/search")
        .set_json(json!(["beach"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_facets_cover_full_catalog() {
    let (status, body) = get_json("/api/destinations/facets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["regions"],
        json!([
            "Africa",
            "Asia",
            "Europe",
            "North America",
            "Oceania",
            "South America"
        ])
    );
    let categories = body["categories"].as_array().unwrap();
    assert!(categories.contains(&json!("Beach")));
    assert!(categories.contains(&json!("Safari")));
    assert_eq!(body["activities"].as_array().unwrap().len(), 32);
}

#[actix_web::test]
async fn test_popular_destinations() {
    let (_, body) = get_json("/api/destinations/popular?limit=3").await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Machu Picchu", "Serengeti National Park", "Santorini"]);

    let (_, body) = get_json("/api/destinations/popular").await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn test_destination_by_id() {
    let (status, body) = get_json("/api/destinations/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Kyoto");
    assert_eq!(body["bestTime"], "March to May, October to November");

    let app = test::init_service(common::create_app()).await;
    let req = test::TestRequest::get()
        .uri("/api/destinations/99")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
