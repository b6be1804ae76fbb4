//! API integration tests
//!
//! These run against a live server backed by MongoDB.

use mongodb::bson::oid::ObjectId;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio_test::assert_ok;

const BASE_URL: &str = "http://localhost:8000";

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, ObjectId::new().to_hex())
}

async fn post_json(client: &Client, path: &str, body: Value) -> (StatusCode, Value) {
    let response = assert_ok!(client.post(format!("{}{}", BASE_URL, path)).json(&body).send().await);
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(client: &Client, path: &str) -> (StatusCode, Value) {
    let response = assert_ok!(client.get(format!("{}{}", BASE_URL, path)).send().await);
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn create(client: &Client, path: &str, body: Value) -> String {
    let (status, body) = post_json(client, path, body).await;
    assert_eq!(status, StatusCode::CREATED, "{}: {}", path, body);
    body["id"].as_str().expect("No id in response").to_string()
}

async fn create_equipment(client: &Client) -> String {
    create(
        client,
        "/equipment",
        json!({ "name": unique("Lathe"), "serial_number": unique("SN") }),
    )
    .await
}

async fn create_work_center(client: &Client) -> String {
    create(client, "/work-centers", json!({ "name": unique("Assembly") })).await
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();
    let (status, body) = get_json(&client, "/health").await;
    assert!(status.is_success());
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_signup_login_and_me() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("tech"));

    let (status, body) = post_json(
        &client,
        "/auth/signup",
        json!({ "name": "Tess", "email": email, "password": "Str0ng!Pass", "role": "technician" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "technician");

    let (status, _) = post_json(
        &client,
        "/auth/signup",
        json!({ "name": "Tess", "email": email, "password": "Str0ng!Pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &client,
        "/auth/login",
        json!({ "email": email, "password": "Wrong!Pass1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_json(
        &client,
        "/auth/login",
        json!({ "email": email, "password": "Str0ng!Pass" }),
    )
    .await;
    assert!(status.is_success());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["role"], "technician");
    assert!(body["team_id"].is_null());
    assert!(body.get("password").is_none());
    let token = body["token"].as_str().expect("No token").to_string();

    let response = assert_ok!(
        client
            .get(format!("{}/auth/me", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
    );
    assert!(response.status().is_success());
    let body: Value = assert_ok!(response.json().await);
    assert_eq!(body["email"], email);
}

#[tokio::test]
#[ignore]
async fn test_weak_password_is_rejected() {
    let client = Client::new();
    let (status, _) = post_json(
        &client,
        "/auth/signup",
        json!({ "name": "Wes", "email": format!("{}@example.com", unique("weak")), "password": "Abcdef1!" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_login_unknown_email() {
    let client = Client::new();
    let (status, _) = post_json(
        &client,
        "/auth/login",
        json!({ "email": format!("{}@example.com", unique("ghost")), "password": "Str0ng!Pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_request_with_both_targets_keeps_equipment() {
    let client = Client::new();
    let equipment_id = create_equipment(&client).await;
    let work_center_id = create_work_center(&client).await;

    let request_id = create(
        &client,
        "/requests",
        json!({
            "subject": "Noisy bearing",
            "equipment_id": equipment_id,
            "work_center_id": work_center_id
        }),
    )
    .await;

    let (status, body) = get_json(&client, &format!("/requests/{}", request_id)).await;
    assert!(status.is_success());
    assert_eq!(body["equipment_id"], equipment_id.as_str());
    assert!(body["work_center_id"].is_null());
    assert!(body.get("_id").is_none());
    assert_eq!(body["id"], request_id.as_str());
}

#[tokio::test]
#[ignore]
async fn test_request_without_target_is_rejected() {
    let client = Client::new();
    let (status, _) = post_json(&client, "/requests", json!({ "subject": "Orphan" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &client,
        "/requests",
        json!({ "subject": "Dangling", "equipment_id": ObjectId::new().to_hex() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_scrap_stage_scraps_equipment() {
    let client = Client::new();
    let equipment_id = create_equipment(&client).await;
    let request_id = create(
        &client,
        "/requests",
        json!({ "subject": "Beyond repair", "equipment_id": equipment_id }),
    )
    .await;

    let response = assert_ok!(
        client
            .put(format!("{}/requests/{}", BASE_URL, request_id))
            .json(&json!({ "stage": "Scrap" }))
            .send()
            .await
    );
    assert!(response.status().is_success());

    let (_, equipment) = get_json(&client, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["status"], "Scrapped");
    assert!(equipment["scrap_date"].is_string());

    let (_, request) = get_json(&client, &format!("/requests/{}", request_id)).await;
    assert_eq!(request["stage"], "Scrap");
    assert!(request.get("pending_scrap_equipment_id").is_none());

    // Deleting the request does not bring the equipment back
    let response = assert_ok!(
        client
            .delete(format!("{}/requests/{}", BASE_URL, request_id))
            .send()
            .await
    );
    assert!(response.status().is_success());
    let (_, equipment) = get_json(&client, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["status"], "Scrapped");
}

#[tokio::test]
#[ignore]
async fn test_scrap_stage_on_work_center_request_leaves_equipment() {
    let client = Client::new();
    let equipment_id = create_equipment(&client).await;
    let work_center_id = create_work_center(&client).await;
    let request_id = create(
        &client,
        "/requests",
        json!({ "subject": "Line stop", "work_center_id": work_center_id }),
    )
    .await;

    let response = assert_ok!(
        client
            .put(format!("{}/requests/{}", BASE_URL, request_id))
            .json(&json!({ "stage": "Scrap" }))
            .send()
            .await
    );
    assert!(response.status().is_success());

    let (_, equipment) = get_json(&client, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["status"], "Active");
}

#[tokio::test]
#[ignore]
async fn test_listed_requests_have_target_names() {
    let client = Client::new();
    let work_center_id = create_work_center(&client).await;
    create(
        &client,
        "/requests",
        json!({ "subject": "Calibration", "work_center_id": work_center_id }),
    )
    .await;

    let (status, body) = get_json(&client, "/requests").await;
    assert!(status.is_success());
    let requests = body.as_array().expect("Expected an array");
    assert!(!requests.is_empty());
    for request in requests {
        let name = request["target_name"].as_str().unwrap_or_default();
        assert!(!name.is_empty(), "{}", request);
    }
}

#[tokio::test]
#[ignore]
async fn test_deleting_equipment_deletes_its_requests() {
    let client = Client::new();
    let equipment_id = create_equipment(&client).await;
    let request_id = create(
        &client,
        "/requests",
        json!({ "subject": "Oil leak", "equipment_id": equipment_id }),
    )
    .await;

    let (_, equipment) = get_json(&client, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["request_count"], 1);

    let response = assert_ok!(
        client
            .delete(format!("{}/equipment/{}", BASE_URL, equipment_id))
            .send()
            .await
    );
    assert!(response.status().is_success());
    let body: Value = assert_ok!(response.json().await);
    assert_eq!(body["deleted_requests"], 1);

    let (status, _) = get_json(&client, &format!("/requests/{}", request_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_missing_versus_malformed_ids() {
    let client = Client::new();
    let (status, _) = get_json(&client, &format!("/equipment/{}", ObjectId::new().to_hex())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&client, "/equipment/not-an-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_team_lists_assigned_member() {
    let client = Client::new();
    let team_id = create(&client, "/teams", json!({ "name": unique("Mechanics") })).await;

    let email = format!("{}@example.com", unique("member"));
    let (_, body) = post_json(
        &client,
        "/auth/signup",
        json!({ "name": "Mia", "email": email, "password": "Str0ng!Pass", "role": "technician" }),
    )
    .await;
    let user_id = body["id"].as_str().expect("No user id").to_string();

    let (status, _) = post_json(
        &client,
        &format!("/teams/{}/assign", team_id),
        json!({ "user_id": user_id }),
    )
    .await;
    assert!(status.is_success());

    let (_, team) = get_json(&client, &format!("/teams/{}", team_id)).await;
    let members = team["members"].as_array().expect("Expected members");
    assert!(members.iter().any(|m| m["id"] == user_id.as_str()));
    assert!(members.iter().all(|m| m.get("password").is_none()));
}

#[tokio::test]
#[ignore]
async fn test_request_created_in_scrap_leaves_equipment_active() {
    let client = Client::new();
    let equipment_id = create_equipment(&client).await;
    create(
        &client,
        "/requests",
        json!({ "subject": "Written off", "equipment_id": equipment_id, "stage": "Scrap" }),
    )
    .await;

    let (_, equipment) = get_json(&client, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["status"], "Active");
}

#[tokio::test]
#[ignore]
async fn test_retargeting_scrapped_request_leaves_new_equipment_active() {
    let client = Client::new();
    let first = create_equipment(&client).await;
    let second = create_equipment(&client).await;
    let request_id = create(
        &client,
        "/requests",
        json!({ "subject": "Cracked frame", "equipment_id": first }),
    )
    .await;

    for body in [json!({ "stage": "Scrap" }), json!({ "equipment_id": second })] {
        let response = assert_ok!(
            client
                .put(format!("{}/requests/{}", BASE_URL, request_id))
                .json(&body)
                .send()
                .await
        );
        assert!(response.status().is_success());
    }

    let (_, equipment) = get_json(&client, &format!("/equipment/{}", second)).await;
    assert_eq!(equipment["status"], "Active");
}

#[tokio::test]
#[ignore]
async fn test_deleting_missing_equipment_keeps_requests() {
    let client = Client::new();
    let equipment_id = create_equipment(&client).await;
    let request_id = create(
        &client,
        "/requests",
        json!({ "subject": "Loose belt", "equipment_id": equipment_id }),
    )
    .await;

    // Point the request at an equipment id that was never created
    let ghost = ObjectId::new().to_hex();
    let response = assert_ok!(
        client
            .put(format!("{}/requests/{}", BASE_URL, request_id))
            .json(&json!({ "equipment_id": ghost }))
            .send()
            .await
    );
    assert!(response.status().is_success());

    let response = assert_ok!(
        client
            .delete(format!("{}/equipment/{}", BASE_URL, ghost))
            .send()
            .await
    );
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (status, _) = get_json(&client, &format!("/requests/{}", request_id)).await;
    assert!(status.is_success());
}

#[tokio::test]
#[ignore]
async fn test_malformed_bodies_are_bad_requests() {
    let client = Client::new();
    for (path, body) in [
        ("/requests", json!({ "equipment_id": ObjectId::new().to_hex() })),
        ("/requests", json!({ "subject": "Leak", "stage": "Exploded" })),
        ("/auth/signup", json!({ "name": "Nia", "email": "nia@example.com" })),
    ] {
        let (status, body) = post_json(&client, path, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert!(body["message"].is_string(), "{}", body);
    }
}
