//! Integration tests for the template gallery and CRUD endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_template, create_test_app, create_test_app_with, delete, get, json_request,
    parse_response_body, test_config,
};
use domain::models::TemplateConfig;
use domain::services::InMemoryTemplateStore;
use fake::{faker::lorem::en::Sentence, Fake};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_list_puts_system_templates_first() {
    let app = create_test_app();
    let created = create_template(&app, "My Concert Mail", "concerts").await;

    let response = app.send(get("/api/v1/templates")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let templates = body["templates"].as_array().unwrap();
    let system_count = common::builtin_catalog().len();

    assert_eq!(body["total"], system_count + 1);
    assert_eq!(templates[0]["id"], "system-0");
    assert_eq!(templates[0]["is_system"], true);
    assert_eq!(templates[system_count]["id"], created["id"]);
    assert_eq!(templates[system_count]["is_system"], false);
}

#[tokio::test]
async fn test_add_on_tab_only_lists_add_ons() {
    let app = create_test_app();

    let response = app.send(get("/api/v1/templates?tab=add-on")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let templates = body["templates"].as_array().unwrap();
    assert!(!templates.is_empty());
    assert!(templates.iter().all(|t| t["layout_type"] == "add-on"));
}

#[tokio::test]
async fn test_unknown_tab_is_rejected() {
    let app = create_test_app();

    let response = app.send(get("/api/v1/templates?tab=popular")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_search_filters_by_name() {
    let app = create_test_app();
    create_template(&app, "Harbor Lights Gala", "awards").await;

    let response = app.send(get("/api/v1/templates?search=harbor%20lights")).await;
    let body = parse_response_body(response).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["templates"][0]["name"], "Harbor Lights Gala");
}

#[tokio::test]
async fn test_counts_include_user_templates() {
    let app = create_test_app();
    let before = parse_response_body(app.send(get("/api/v1/templates/counts")).await).await;

    create_template(&app, "Lot B Parking", "parking").await;

    let after = parse_response_body(app.send(get("/api/v1/templates/counts")).await).await;
    assert_eq!(after["total"], before["total"].as_u64().unwrap() + 1);
    assert_eq!(after["add-on"], before["add-on"].as_u64().unwrap() + 1);
    assert_eq!(after["group"], before["group"]);
}

#[tokio::test]
async fn test_create_and_fetch_template() {
    let app = create_test_app();
    let description: String = Sentence(3..8).fake();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/templates",
            &json!({
                "name": "Friday Night Comedy",
                "category": "comedy",
                "description": description,
                "html_template": "<div>{{comedianName}}</div>",
                "style_tags": ["dark", "neon"],
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = parse_response_body(response).await;
    assert_eq!(created["layout_type"], "individual");
    assert!(created["config"]["fontHeading"].is_string());

    let id = created["id"].as_str().unwrap();
    let response = app.send(get(&format!("/api/v1/templates/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = parse_response_body(response).await;
    assert_eq!(fetched["name"], "Friday Night Comedy");
    assert_eq!(fetched["description"], description.as_str());
}

#[tokio::test]
async fn test_create_validates_fields() {
    let app = create_test_app();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/templates",
            &json!({
                "name": "   ",
                "category": "concerts",
                "html_template": "<div></div>",
                "style_tags": ["Not A Slug"],
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "style_tags"]);
}

#[tokio::test]
async fn test_create_validates_nested_config() {
    let app = create_test_app();
    let mut config = serde_json::to_value(TemplateConfig::default()).unwrap();
    config["backgroundColor"] = json!("not-a-color");

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/templates",
            &json!({
                "name": "Broken Colors",
                "category": "concerts",
                "html_template": "<div></div>",
                "config": config,
            }),
        ))
        .await;

    let status = response.status();
    let body = parse_response_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["details"][0]["field"], "config.background_color");
}

#[tokio::test]
async fn test_system_templates_are_read_only() {
    let app = create_test_app();

    let response = app
        .send(json_request(
            Method::PATCH,
            "/api/v1/templates/system-0",
            &json!({ "name": "Renamed" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(delete("/api/v1/templates/system-0")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request(Method::POST, "/api/v1/templates/system-0/favorite", &json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(get("/api/v1/templates/system-0")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_template() {
    let app = create_test_app();
    let created = create_template(&app, "Draft", "general").await;
    let uri = format!("/api/v1/templates/{}", created["id"].as_str().unwrap());

    let response = app
        .send(json_request(
            Method::PATCH,
            &uri,
            &json!({ "name": "Final", "theme_mode": "dark" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = parse_response_body(response).await;
    assert_eq!(updated["name"], "Final");
    assert_eq!(updated["theme_mode"], "dark");
    assert_eq!(updated["category"], "general");

    let response = app.send(json_request(Method::PATCH, &uri, &json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_template() {
    let app = create_test_app();
    let created = create_template(&app, "Short Lived", "minimal").await;
    let uri = format!("/api/v1/templates/{}", created["id"].as_str().unwrap());

    let response = app.send(delete(&uri)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(get(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(delete(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_favorite_and_favorites_tab() {
    let app = create_test_app();
    let created = create_template(&app, "Keeper", "festivals").await;
    let uri = format!(
        "/api/v1/templates/{}/favorite",
        created["id"].as_str().unwrap()
    );

    let response = app.send(json_request(Method::POST, &uri, &json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["is_favorite"], true);

    let body = parse_response_body(app.send(get("/api/v1/templates?tab=favorites")).await).await;
    assert!(body["templates"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == created["id"]));

    let response = app.send(json_request(Method::POST, &uri, &json!({}))).await;
    assert_eq!(parse_response_body(response).await["is_favorite"], false);
}

#[tokio::test]
async fn test_duplicate_system_template() {
    let app = create_test_app();
    let source = parse_response_body(app.send(get("/api/v1/templates/system-1")).await).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/templates/system-1/duplicate",
            &json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let copy = parse_response_body(response).await;
    assert_eq!(copy["name"], format!("{} (Copy)", source["name"].as_str().unwrap()));
    assert_eq!(copy["is_system"], false);
    assert_eq!(copy["html_template"], source["html_template"]);
    assert_ne!(copy["id"], source["id"]);
}

#[tokio::test]
async fn test_usage_is_tracked_in_background() {
    let app = create_test_app();
    let created = create_template(&app, "Weekly Digest", "general").await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .send(json_request(
            Method::POST,
            &format!("/api/v1/templates/{}/usage", id),
            &json!({ "outputFormat": "email", "eventId": "evt-42" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let mut usage = Vec::new();
    for _ in 0..50 {
        usage = app.store.usage().await;
        if !usage.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].template_id, id);
    assert_eq!(usage[0].event_id.as_deref(), Some("evt-42"));

    let body = parse_response_body(app.send(get("/api/v1/templates?tab=recent")).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["templates"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_usage_failure_is_not_reported() {
    let app = create_test_app_with(InMemoryTemplateStore::failing(), test_config(&[]));

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/templates/system-0/usage",
            &json!({ "outputFormat": "quick_share" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_store_failure_maps_to_internal_error() {
    let app = create_test_app_with(InMemoryTemplateStore::failing(), test_config(&[]));

    let response = app.send(get("/api/v1/templates")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body["message"], "An internal error occurred");
}
