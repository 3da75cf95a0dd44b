//! End-to-end API integration tests
//!
//! These tests drive the full router against an in-memory SQLite database:
//! - User registration and login
//! - Bearer token gate on mutating endpoints
//! - Category and item CRUD, pagination and routing fallbacks
//! - Database persistence verification

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use inventory_api::api::{router, AppState};
use inventory_api::auth::{PasswordHasher, TokenService};
use inventory_api::domain::repositories::{CategoryRepository, ItemRepository};
use inventory_api::domain::{CategoryName, NewItem};
use inventory_api::infrastructure::database;
use inventory_api::infrastructure::repositories::{SqliteCategoryRepository, SqliteItemRepository};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for oneshot

const TEST_SECRET: &[u8] = b"integration-test-secret";

struct TestApp {
    app: Router,
    pool: SqlitePool,
    tokens: TokenService,
}

/// Setup test application over a fresh in-memory database
async fn setup_app() -> TestApp {
    let pool = database::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    database::migrate_up(&pool)
        .await
        .expect("Failed to create schema");

    let tokens = TokenService::new(TEST_SECRET);
    let state = AppState::new(
        pool.clone(),
        tokens.clone(),
        PasswordHasher::with_cost("test-pepper", 4),
    );

    TestApp {
        app: router(state),
        pool,
        tokens,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&body))
            })
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        payload: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(
            builder
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::DELETE).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Register a user and log in, returning the bearer token
    async fn login_token(&self) -> String {
        let credentials = json!({ "username": "tester", "password": "s3cret-pass" });

        let (status, _) = self
            .send_json(Method::POST, "/register", None, credentials.clone())
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send_json(Method::POST, "/login", None, credentials)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token in body").to_string()
    }

    async fn create_category(&self, name: &str) -> i64 {
        SqliteCategoryRepository::new(self.pool.clone())
            .create(&CategoryName::new(name).unwrap())
            .await
            .expect("Failed to create category")
    }

    async fn create_item(&self, category_id: i64, name: &str, price: Decimal) -> i64 {
        let item = NewItem::new(category_id, name, None, price).unwrap();
        SqliteItemRepository::new(self.pool.clone())
            .create(&item)
            .await
            .expect("Failed to create item")
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;

    let response = app
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = setup_app().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/register",
            None,
            json!({ "username": "alice", "password": "wonderland" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert!(body["id"].is_i64());

    let stored_hash: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'alice'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_ne!(stored_hash, "wonderland");

    let (status, body) = app
        .send_json(
            Method::POST,
            "/login",
            None,
            json!({ "username": "alice", "password": "wonderland" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert!(app.tokens.verify(token));
}

#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let app = setup_app().await;
    let credentials = json!({ "username": "bob", "password": "first-password" });

    let (status, _) = app
        .send_json(Method::POST, "/register", None, credentials)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let hash_before: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'bob'")
            .fetch_one(&app.pool)
            .await
            .unwrap();

    let (status, body) = app
        .send_json(
            Method::POST,
            "/register",
            None,
            json!({ "username": "bob", "password": "second-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");

    assert_eq!(app.count("users").await, 1);
    let hash_after: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'bob'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(hash_before, hash_after);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = setup_app().await;

    for payload in [
        json!({ "username": "carol" }),
        json!({ "password": "no-username" }),
        json!({}),
    ] {
        let (status, body) = app
            .send_json(Method::POST, "/register", None, payload)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing required fields");
    }

    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = setup_app().await;
    app.login_token().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/login",
            None,
            json!({ "username": "tester", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = app
        .send_json(
            Method::POST,
            "/login",
            None,
            json!({ "username": "nobody", "password": "s3cret-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_category_requires_valid_token() {
    let app = setup_app().await;
    let payload = json!({ "name": "Garden" });

    // No header at all
    let (status, body) = app
        .send_json(Method::POST, "/categories", None, payload.clone())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    // Wrong scheme
    let request = Request::builder()
        .method(Method::POST)
        .uri("/categories")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unsigned base64 payload with a far-future expiry
    let (status, _) = app
        .send_json(
            Method::POST,
            "/categories",
            Some("eyJleHAiOiA0MTAyNDQ0ODAwfQ=="),
            payload.clone(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Expired token
    let expired = app
        .tokens
        .issue_with_expiry(Utc::now() - Duration::seconds(1))
        .unwrap();
    let (status, _) = app
        .send_json(Method::POST, "/categories", Some(&expired), payload.clone())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Token signed by another instance
    let foreign = TokenService::new(b"someone-else").issue().unwrap();
    let (status, _) = app
        .send_json(Method::POST, "/categories", Some(&foreign), payload)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.count("categories").await, 0);
}

#[tokio::test]
async fn test_auth_rejected_before_body_is_parsed() {
    let app = setup_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/items")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_category_and_duplicate() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/categories",
            Some(&token),
            json!({ "name": "Garden" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category created successfully");
    let category_id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .send_json(
            Method::POST,
            "/categories",
            Some(&token),
            json!({ "name": "Garden" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let (status, body) = app.get("/categories/names").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": category_id, "name": "Garden" }]));
}

#[tokio::test]
async fn test_create_category_blank_name() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let (status, body) = app
        .send_json(Method::POST, "/categories", Some(&token), json!({ "name": "  " }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category name cannot be empty");
    assert_eq!(app.count("categories").await, 0);
}

#[tokio::test]
async fn test_list_categories_nests_items() {
    let app = setup_app().await;
    let electronics = app.create_category("Electronics").await;
    let home = app.create_category("Home").await;
    let laptop = app
        .create_item(electronics, "Laptop", Decimal::new(99999, 2))
        .await;

    let (status, body) = app.get("/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "id": electronics,
                "name": "Electronics",
                "items": [
                    { "id": laptop, "name": "Laptop", "description": null, "price": 999.99 }
                ]
            },
            { "id": home, "name": "Home", "items": [] }
        ])
    );
}

#[tokio::test]
async fn test_list_category_items() {
    let app = setup_app().await;
    let fashion = app.create_category("Fashion").await;
    let empty = app.create_category("Empty").await;
    app.create_item(fashion, "Jeans", Decimal::new(4999, 2)).await;
    app.create_item(fashion, "T-Shirt", Decimal::new(1999, 2)).await;

    let (status, body) = app.get(&format!("/categories/{}/items", fashion)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Jeans", "T-Shirt"]);

    let (status, body) = app.get(&format!("/categories/{}/items", empty)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No items found in this category");
}

#[tokio::test]
async fn test_create_item_with_unknown_category() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/items",
            Some(&token),
            json!({ "category_id": 404, "name": "Ghost", "price": 1.5 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category does not exist: 404");
    assert_eq!(app.count("items").await, 0);
}

#[tokio::test]
async fn test_item_round_trip() {
    let app = setup_app().await;
    let token = app.login_token().await;
    let category_id = app.create_category("Electronics").await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/items",
            Some(&token),
            json!({
                "category_id": category_id,
                "name": "Laptop",
                "description": "A high-performance laptop",
                "price": 999.99
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Item created");
    let item_id = body["id"].as_i64().unwrap();

    let (status, item) = app.get(&format!("/items/{}", item_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["id"], item_id);
    assert_eq!(item["category_id"], category_id);
    assert_eq!(item["name"], "Laptop");
    assert_eq!(item["description"], "A high-performance laptop");
    assert_eq!(item["price"], json!(999.99));
    assert!(item["created_at"].is_string());
    assert_eq!(item["created_at"], item["updated_at"]);
}

#[tokio::test]
async fn test_create_item_validation() {
    let app = setup_app().await;
    let token = app.login_token().await;
    let category_id = app.create_category("Home").await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/items",
            Some(&token),
            json!({ "category_id": category_id, "name": "Sofa", "price": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item price cannot be negative");

    let (status, _) = app
        .send_json(
            Method::POST,
            "/items",
            Some(&token),
            json!({ "category_id": category_id, "name": "Sofa" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.count("items").await, 0);
}

#[tokio::test]
async fn test_pagination() {
    let app = setup_app().await;
    let category_id = app.create_category("Bulk").await;
    for n in 1..=6 {
        app.create_item(category_id, &format!("Item {}", n), Decimal::from(n))
            .await;
    }

    let (status, body) = app.get("/items?page=2&per_page=2").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Item 3", "Item 4"]);
    assert_eq!(
        body["pagination"],
        json!({ "total_items": 6, "total_pages": 3, "current_page": 2, "per_page": 2 })
    );
}

#[tokio::test]
async fn test_pagination_defaults_and_bounds() {
    let app = setup_app().await;
    let category_id = app.create_category("Bulk").await;
    for n in 1..=12 {
        app.create_item(category_id, &format!("Item {}", n), Decimal::from(n))
            .await;
    }

    let (status, body) = app.get("/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["pagination"]["current_page"], 1);

    let (status, body) = app.get("/items?page=5").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());

    for uri in ["/items?page=0", "/items?per_page=0", "/items?page=abc"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_update_item() {
    let app = setup_app().await;
    let token = app.login_token().await;
    let category_id = app.create_category("Electronics").await;
    let item_id = app
        .create_item(category_id, "Laptop", Decimal::new(99999, 2))
        .await;

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/items/{}", item_id),
            Some(&token),
            json!({
                "name": "Updated Laptop",
                "description": "An even more powerful laptop",
                "price": 1099.99
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item updated");

    let (_, item) = app.get(&format!("/items/{}", item_id)).await;
    assert_eq!(item["name"], "Updated Laptop");
    assert_eq!(item["description"], "An even more powerful laptop");
    assert_eq!(item["price"], json!(1099.99));
    assert_eq!(item["category_id"], category_id);

    let created = chrono::DateTime::parse_from_rfc3339(item["created_at"].as_str().unwrap()).unwrap();
    let updated = chrono::DateTime::parse_from_rfc3339(item["updated_at"].as_str().unwrap()).unwrap();
    assert!(updated >= created);
}

#[tokio::test]
async fn test_update_requires_token_and_existing_item() {
    let app = setup_app().await;
    let token = app.login_token().await;
    let category_id = app.create_category("Home").await;
    let item_id = app.create_item(category_id, "Table", Decimal::new(29999, 2)).await;
    let payload = json!({ "name": "Chair", "price": 10 });

    let (status, _) = app
        .send_json(Method::PUT, &format!("/items/{}", item_id), None, payload.clone())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, item) = app.get(&format!("/items/{}", item_id)).await;
    assert_eq!(item["name"], "Table");

    let (status, body) = app
        .send_json(Method::PUT, "/items/9999", Some(&token), payload)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");
}

#[tokio::test]
async fn test_update_missing_item_is_checked_before_fields() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let (status, body) = app
        .send_json(
            Method::PUT,
            "/items/9999",
            Some(&token),
            json!({ "description": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    let category_id = app.create_category("Home").await;
    let item_id = app.create_item(category_id, "Lamp", Decimal::new(1500, 2)).await;
    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/items/{}", item_id),
            Some(&token),
            json!({ "description": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));

    let (_, item) = app.get(&format!("/items/{}", item_id)).await;
    assert_eq!(item["name"], "Lamp");
}

#[tokio::test]
async fn test_update_rejects_malformed_json_before_lookup() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/items/9999")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_delete_item() {
    let app = setup_app().await;
    let token = app.login_token().await;
    let category_id = app.create_category("Home").await;
    let item_id = app.create_item(category_id, "Sofa", Decimal::new(99999, 2)).await;
    let uri = format!("/items/{}", item_id);

    let (status, _) = app.delete(&uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.count("items").await, 1);

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmatched_routes_return_not_found() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let (status, body) = app.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");

    let (status, _) = app.get("/items/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/items/1.5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Known path, unsupported method
    let (status, body) = app.delete("/categories", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");

    let (status, _) = app
        .send_json(Method::PATCH, "/items/1", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send_json(Method::PUT, "/items/abc", Some(&token), json!({ "name": "x", "price": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let app = setup_app().await;
    let token = app.login_token().await;

    for body in ["{\"name\": ", "", "[1, 2"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/categories")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body))
            .unwrap();
        let (status, json) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .body(Body::from("not json"))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_json_body_without_content_type() {
    let app = setup_app().await;
    let token = app.login_token().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/categories")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(r#"{"name": "Toys"}"#))
        .unwrap();
    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.count("categories").await, 1);
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = setup_app().await;
    let token = app.login_token().await;

    // axum's default body limit is 2 MiB
    let name = "a".repeat(3 * 1024 * 1024);
    let (status, body) = app
        .send_json(Method::POST, "/categories", Some(&token), json!({ "name": name }))
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["message"].is_string());
    assert_eq!(app.count("categories").await, 0);
}
