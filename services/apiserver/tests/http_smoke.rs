mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{admin_token, jwt_app, read_json, user_token};
use http_helpers::{authed_json_request, authed_request};
use tower::ServiceExt;

#[tokio::test]
async fn root_and_health_are_public() {
    let app = jwt_app();

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("root");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(&bytes[..], b"Hello, World!");

    let response = app
        .oneshot(
            Request::get("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_f64().expect("uptime") >= 0.0);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = jwt_app();
    let response = app
        .oneshot(
            Request::get("/api/v1/openapi.json")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["paths"]["/api/v1/reviews"].is_object());
    assert_eq!(body["info"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn reviews_crud_smoke() {
    let app = jwt_app();
    let user = user_token("user-1");
    let admin = admin_token();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/v1/reviews",
            &user,
            serde_json::json!({
                "title": "Great blender",
                "content": "Crushes ice in seconds",
                "rating": "4"
            }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Review created successfully");
    assert_eq!(body["data"]["authorId"], "user-1");
    assert_eq!(body["data"]["rating"].as_f64(), Some(4.0));
    let id = body["data"]["id"].as_str().expect("id").to_string();

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/v1/reviews", &admin))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Reviews successfully retrieved");
    assert_eq!(body["data"].as_array().expect("reviews").len(), 1);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/v1/reviews/{id}"),
            &user,
            serde_json::json!({ "rating": 5 }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Review updated successfully");
    assert_eq!(body["data"]["rating"].as_f64(), Some(5.0));
    assert_eq!(body["data"]["title"], "Great blender");

    let response = app
        .clone()
        .oneshot(authed_request("GET", &format!("/api/v1/reviews/{id}"), &user))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Review retrieved successfully");
    assert_eq!(body["data"]["content"], "Crushes ice in seconds");

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/v1/reviews/{id}"),
            &admin,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Review successfully deleted");

    let response = app
        .oneshot(authed_request("GET", &format!("/api/v1/reviews/{id}"), &admin))
        .await
        .expect("get deleted");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], format!("Review with ID {id} not found"));
}

#[tokio::test]
async fn comments_crud_smoke() {
    let app = jwt_app();
    let user = user_token("user-2");

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/v1/comments",
            &user,
            serde_json::json!({ "comment": "Agreed, it is loud though" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Comment created successfully");
    assert_eq!(body["data"]["authorId"], "user-2");
    let id = body["data"]["id"].as_str().expect("id").to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/v1/comments/{id}"),
            &user,
            serde_json::json!({ "comment": "Agreed, but it is loud" }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["comment"], "Agreed, but it is loud");

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/v1/comments", &user))
        .await
        .expect("list");
    let body = read_json(response).await;
    assert_eq!(body["message"], "Comments successfully retrieved");
    assert_eq!(body["data"].as_array().expect("comments").len(), 1);

    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/v1/comments/{id}"),
            &user,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Comment successfully deleted");
}

#[tokio::test]
async fn categories_crud_smoke() {
    let app = jwt_app();
    let admin = admin_token();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/v1/categories",
            &admin,
            serde_json::json!({ "name": "Kitchen" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Category created successfully");
    assert_eq!(body["data"]["name"], "Kitchen");
    let id = body["data"]["id"].as_str().expect("id").to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/v1/categories/{id}"),
            &admin,
            serde_json::json!({ "name": "Kitchen & Dining" }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Category updated successfully");
    assert_eq!(body["data"]["name"], "Kitchen & Dining");

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/v1/categories", &user_token("user-3")))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Categories successfully retrieved");

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/v1/categories/{id}"),
            &admin,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/v1/categories/{id}"),
            &admin,
        ))
        .await
        .expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], format!("Category with ID {id} not found"));
}
