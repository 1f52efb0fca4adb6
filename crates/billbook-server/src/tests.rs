//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use billbook_core::db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

fn setup_with_user() -> (Router, Database, i64) {
    let (app, db) = setup_test_app();
    let user = db.register_user("tester", "password123").unwrap();
    (app, db, user.id)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ========== Auth API Tests ==========

#[tokio::test]
async fn test_signup_and_login() {
    let (app, _db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            serde_json::json!({"username": "alice", "password": "correct-horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = get_body_json(response).await;
    assert_eq!(user["username"], "alice");
    assert!(user.get("password_hash").is_none());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({"username": "alice", "password": "correct-horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["id"], user["id"]);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({"username": "alice", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_conflict_and_weak_password() {
    let (app, _db, _user_id) = setup_with_user();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            serde_json::json!({"username": "tester", "password": "password456"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/signup",
            serde_json::json!({"username": "newbie", "password": "short"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/signup")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(get_body_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON"));
}

// ========== Bill API Tests ==========

#[tokio::test]
async fn test_create_and_list_bills() {
    let (app, _db, user_id) = setup_with_user();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{}/bills/water", user_id),
            serde_json::json!({"usage": "10", "rate": 200, "date": "2024-01"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bill = get_body_json(response).await;
    assert_eq!(bill["amount"], 20.0);
    assert_eq!(bill["date"], "2024-01-01");
    assert_eq!(bill["category"], "water");

    let response = app
        .oneshot(get(&format!("/api/users/{}/bills/water", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bills = get_body_json(response).await;
    assert_eq!(bills.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_bill_validation_errors() {
    let (app, db, user_id) = setup_with_user();

    for body in [
        serde_json::json!({"usage": "lots", "rate": "200", "date": "2024-01"}),
        serde_json::json!({"usage": "0", "rate": "200", "date": "2024-01"}),
        serde_json::json!({"usage": "10", "rate": "200", "date": "2999-01"}),
        serde_json::json!({"usage": "10", "rate": "200", "date": "Jan 2024"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/users/{}/bills/gas", user_id),
                body.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    assert!(db
        .list_bills(user_id, billbook_core::Category::Gas)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unknown_category() {
    let (app, _db, user_id) = setup_with_user();

    let response = app
        .oneshot(get(&format!("/api/users/{}/bills/steam", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = get_body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("steam"));
}

#[tokio::test]
async fn test_get_update_delete_bill() {
    let (app, db, user_id) = setup_with_user();
    let bill = db
        .add_bill(
            user_id,
            billbook_core::Category::Electricity,
            &billbook_core::BillInput::new("100", "12", "2024-02"),
        )
        .unwrap();
    let uri = format!("/api/users/{}/bills/electricity/{}", user_id, bill.id);

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["amount"], 12.0);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            serde_json::json!({"usage": 150, "rate": 12, "date": "2024-03"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = get_body_json(response).await;
    assert_eq!(updated["amount"], 18.0);
    assert_eq!(updated["date"], "2024-03-01");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_bill_is_not_found() {
    let (app, db, owner_id) = setup_with_user();
    let other = db.register_user("other", "password123").unwrap();
    let bill = db
        .add_bill(
            owner_id,
            billbook_core::Category::Water,
            &billbook_core::BillInput::new("10", "200", "2024-01"),
        )
        .unwrap();

    let uri = format!("/api/users/{}/bills/water/{}", other.id, bill.id);
    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(db
        .get_bill(billbook_core::Category::Water, bill.id)
        .is_ok());
}

#[tokio::test]
async fn test_filter_bills() {
    let (app, db, user_id) = setup_with_user();
    for usage in ["5", "15", "10"] {
        db.add_bill(
            user_id,
            billbook_core::Category::Water,
            &billbook_core::BillInput::new(usage, "200", "2024-01"),
        )
        .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/users/{}/bills/water/filter?usage_min=10&end_date=",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;
    let usages: Vec<f64> = body["bills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["usage"].as_f64().unwrap())
        .collect();
    assert_eq!(usages, vec![15.0, 10.0]);
    // Averages and years cover the whole category
    assert_eq!(body["average_usage"], 10.0);
    assert_eq!(body["years"], serde_json::json!([2024]));

    let response = app
        .oneshot(get(&format!(
            "/api/users/{}/bills/water/filter?start_date=2024/13/40",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Dashboard API Tests ==========

#[tokio::test]
async fn test_dashboard() {
    let (app, db, user_id) = setup_with_user();
    for (usage, month) in [("10", "2023-05"), ("20", "2024-01"), ("30", "2024-02")] {
        db.add_bill(
            user_id,
            billbook_core::Category::Water,
            &billbook_core::BillInput::new(usage, "100", month),
        )
        .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/users/{}/dashboard?year=2024&sort=usage&order=desc",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;
    assert_eq!(body["selected_year"], 2024);
    let water = &body["categories"][0];
    assert_eq!(water["category"], "water");
    assert_eq!(water["average_usage"], 25.0);
    assert_eq!(water["years"], serde_json::json!([2024, 2023]));
    assert_eq!(water["bills"][0]["usage"], 30.0);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{}/dashboard", user_id)))
        .await
        .unwrap();
    let body = get_body_json(response).await;
    assert!(body["selected_year"].is_null());
    assert_eq!(body["categories"][0]["bills"].as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/users/{}/dashboard?sort=colour",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/users/999/dashboard"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Chart API Tests ==========

#[tokio::test]
async fn test_chart_series() {
    let (app, db, user_id) = setup_with_user();
    for (usage, month) in [("10", "2024-01"), ("5", "2024-01"), ("8", "2024-02")] {
        db.add_bill(
            user_id,
            billbook_core::Category::Water,
            &billbook_core::BillInput::new(usage, "200", month),
        )
        .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/users/{}/chart/water?time_range=2024",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let chart = get_body_json(response).await;
    assert_eq!(chart["months"], serde_json::json!(["2024-01-01", "2024-02-01"]));

    let usage = chart["panels"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["field"] == "usage")
        .unwrap();
    assert_eq!(usage["values"], serde_json::json!([15.0, 8.0]));
    assert_eq!(usage["y_label"], "Usage (m³)");
    assert_eq!(usage["trend"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get(&format!(
            "/api/users/{}/chart/water?time_range=2020",
            user_id
        )))
        .await
        .unwrap();
    let chart = get_body_json(response).await;
    assert!(chart["months"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chart_png() {
    let (app, db, user_id) = setup_with_user();
    db.add_bill(
        user_id,
        billbook_core::Category::Electricity,
        &billbook_core::BillInput::new("100", "12", "2024-01"),
    )
    .unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{}/chart/electricity/png", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(&[137, 80, 78, 71, 13, 10, 26, 10]));

    // No bills in range still yields an image
    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/users/{}/chart/gas/png?time_range=2020",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{}/chart/steam/png", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/users/999/chart/gas/png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Export API Tests ==========

#[tokio::test]
async fn test_export_csv() {
    let (app, db, user_id) = setup_with_user();
    db.add_bill(
        user_id,
        billbook_core::Category::Gas,
        &billbook_core::BillInput::new("3", "4.5", "2024-03"),
    )
    .unwrap();

    let response = app
        .oneshot(get(&format!("/api/users/{}/export.csv", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[axum::http::header::CONTENT_DISPOSITION],
        "attachment; filename=\"bills.csv\""
    );
    let csv = get_body_text(response).await;
    assert_eq!(
        csv,
        "Type,Usage,Rate,Date,Amount\nGas,3.0,4.5,2024-03-01,13.5\n"
    );
}

// ========== Misc ==========

#[tokio::test]
async fn test_categories() {
    let (app, _db) = setup_test_app();
    let response = app.oneshot(get("/api/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;
    let specs = body.as_array().unwrap();
    assert_eq!(specs.len(), 3);
    assert_eq!(specs[2]["category"], "gas");
    assert_eq!(specs[2]["rate_unit"], "$");
    assert_eq!(specs[2]["rate_divisor"], 1.0);
}

#[tokio::test]
async fn test_security_headers() {
    let (app, _db) = setup_test_app();
    let response = app.oneshot(get("/api/categories")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" http://a.example , ,http://b.example"),
        vec!["http://a.example".to_string(), "http://b.example".to_string()]
    );
    assert!(parse_origins("").is_empty());
}

#[test]
fn test_app_error_mapping() {
    use billbook_core::Error as CoreError;

    assert_eq!(
        AppError::from(CoreError::InvalidInput("x".into())).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::from(CoreError::NotFound("x".into())).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::from(CoreError::UsernameTaken("x".into())).status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::from(CoreError::InvalidCredentials).status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::from(CoreError::Encryption("x".into())).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
