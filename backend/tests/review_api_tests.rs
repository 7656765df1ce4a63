//! End-to-end tests of the review API through [`ReviewHandler`].

mod support;

use http::{Method, StatusCode};
use serde_json::json;

use review_api::api::{ApiRequest, ID_ALPHABET, ID_LENGTH};
use support::{delete, get, id_of, list, local_handler, patch, post, review_body};

#[tokio::test]
async fn test_create_delete_then_not_found() {
    let handler = local_handler();

    let created = post(
        &handler,
        &json!({"restaurant": "Al's Diner", "stars": 5, "date": "2024-03-01"}),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let data = created.data_payload().unwrap();
    assert_eq!(data["restaurant"], json!("Al's Diner"));
    assert_eq!(data["stars"], json!(5));
    assert_eq!(data["date"], json!("2024-03-01"));

    let id = id_of(&created);
    assert_eq!(id.len(), ID_LENGTH);
    assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));

    let deleted = delete(&handler, &id).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_none());

    let fetched = get(&handler, &id).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    assert_eq!(fetched.error_code(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_get_returns_what_create_returned() {
    let handler = local_handler();
    let created = post(&handler, &review_body("Chez Nous", 3, "2023-12-24")).await;

    let fetched = get(&handler, &id_of(&created)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data_payload(), created.data_payload());
}

#[tokio::test]
async fn test_created_date_is_normalized() {
    let handler = local_handler();
    let created = post(
        &handler,
        &review_body("Chez Nous", 4, "2024-03-01T23:30:00-05:00"),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data_payload().unwrap()["date"], json!("2024-03-01"));
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let handler = local_handler();
    let mut body = review_body("Noodle Bar", 2, "2024-01-15");
    body["id"] = json!("AAAAA");

    let created = post(&handler, &body).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(id_of(&created).len(), ID_LENGTH);
}

#[tokio::test]
async fn test_list_contains_every_review() {
    let handler = local_handler();
    let empty = list(&handler).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.data_payload(), Some(&json!([])));

    let mut ids = Vec::new();
    for (name, stars) in [("Al's Diner", 5), ("Chez Nous", 3), ("Noodle Bar", 1)] {
        ids.push(id_of(&post(&handler, &review_body(name, stars, "2024-03-01")).await));
    }

    let listed = list(&handler).await;
    let items = listed.data_payload().unwrap().as_array().unwrap().clone();
    assert_eq!(items.len(), 3);
    for id in &ids {
        assert!(items.iter().any(|item| item["id"] == json!(id)), "{}", id);
    }
}

#[tokio::test]
async fn test_list_is_idempotent() {
    let handler = local_handler();
    post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await;
    post(&handler, &review_body("Chez Nous", 3, "2024-03-02")).await;

    let mut first: Vec<_> = list(&handler).await.data_payload().unwrap().as_array().unwrap().clone();
    let mut second: Vec<_> = list(&handler).await.data_payload().unwrap().as_array().unwrap().clone();
    let by_id = |a: &serde_json::Value, b: &serde_json::Value| {
        a["id"].as_str().cmp(&b["id"].as_str())
    };
    first.sort_by(by_id);
    second.sort_by(by_id);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let handler = local_handler();
    let created = post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await;
    let id = id_of(&created);

    let updated = patch(&handler, &id, &json!({"stars": 2})).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(
        updated.data_payload(),
        Some(&json!({"id": id, "restaurant": "Al's Diner", "stars": 2, "date": "2024-03-01"}))
    );

    let fetched = get(&handler, &id).await;
    assert_eq!(fetched.data_payload(), updated.data_payload());
}

#[tokio::test]
async fn test_update_every_field() {
    let handler = local_handler();
    let id = id_of(&post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await);

    let updated = patch(
        &handler,
        &id,
        &json!({"restaurant": "Al's Bistro", "stars": 4, "date": "2024-04-02", "id": "ZZZZZ"}),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    let data = updated.data_payload().unwrap();
    assert_eq!(data["id"], json!(id));
    assert_eq!(data["restaurant"], json!("Al's Bistro"));
    assert_eq!(data["stars"], json!(4));
    assert_eq!(data["date"], json!("2024-04-02"));

    assert_eq!(get(&handler, "ZZZZZ").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_absent_review_is_not_found_everywhere() {
    let handler = local_handler();
    for response in [
        get(&handler, "AAAAA").await,
        delete(&handler, "AAAAA").await,
        patch(&handler, "AAAAA", &json!({"stars": 3})).await,
    ] {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code(), Some("NOT_FOUND"));
    }
    assert_eq!(list(&handler).await.data_payload(), Some(&json!([])));
}

#[tokio::test]
async fn test_update_of_absent_review_creates_nothing() {
    let handler = local_handler();
    patch(&handler, "AAAAA", &json!({"restaurant": "Ghost Kitchen"})).await;
    assert_eq!(get(&handler, "AAAAA").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let handler = local_handler();
    let id = id_of(&post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await);
    assert_eq!(delete(&handler, &id).await.status, StatusCode::NO_CONTENT);
    assert_eq!(delete(&handler, &id).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_create_writes_nothing() {
    let handler = local_handler();
    let rejected = [
        json!({"restaurant": "Al's Diner", "stars": 6, "date": "2024-03-01"}),
        json!({"restaurant": "Al's Diner", "stars": 0, "date": "2024-03-01"}),
        json!({"restaurant": "Al's Diner", "stars": "5", "date": "2024-03-01"}),
        json!({"restaurant": "Al's Diner", "stars": 5, "date": "2024-02-30"}),
        json!({"restaurant": "", "stars": 5, "date": "2024-03-01"}),
        json!({"stars": 5, "date": "2024-03-01"}),
        json!([1, 2, 3]),
    ];
    for body in rejected {
        let response = post(&handler, &body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
    }
    assert_eq!(list(&handler).await.data_payload(), Some(&json!([])));
}

#[tokio::test]
async fn test_stars_boundaries() {
    let handler = local_handler();
    for stars in [1, 5] {
        let response = post(&handler, &review_body("Al's Diner", stars, "2024-03-01")).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    for stars in [0, 6] {
        let response = post(&handler, &review_body("Al's Diner", stars, "2024-03-01")).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("INVALID_FIELD"));
        assert_eq!(
            response.body.as_ref().unwrap()["error"]["field"],
            json!("stars")
        );
    }
}

#[tokio::test]
async fn test_invalid_update_leaves_review_unchanged() {
    let handler = local_handler();
    let created = post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await;
    let id = id_of(&created);

    for body in [json!({}), json!({"stars": 9}), json!({"date": "soon", "stars": 1})] {
        let response = patch(&handler, &id, &body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
    }
    assert_eq!(get(&handler, &id).await.data_payload(), created.data_payload());
}

#[tokio::test]
async fn test_body_shape_errors() {
    let handler = local_handler();
    let cases = [
        (ApiRequest::new(Method::POST, "/"), "MISSING_BODY"),
        (ApiRequest::new(Method::POST, "/").with_body("{oops"), "INVALID_JSON"),
        (ApiRequest::new(Method::POST, "/").with_body("\"text\""), "NOT_AN_OBJECT"),
        (ApiRequest::new(Method::PATCH, "/AAAAA"), "MISSING_BODY"),
        (ApiRequest::new(Method::PATCH, "/AAAAA").with_body("[]"), "NOT_AN_OBJECT"),
    ];
    for (request, code) in cases {
        let response = handler.handle(request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some(code));
    }
}

#[tokio::test]
async fn test_unwired_combinations_are_not_implemented() {
    let handler = local_handler();
    let id = id_of(&post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await);

    let cases = [
        (Method::PUT, "/".to_string()),
        (Method::DELETE, "/".to_string()),
        (Method::PATCH, "/".to_string()),
        (Method::PUT, format!("/{}", id)),
        (Method::POST, format!("/{}", id)),
        (Method::HEAD, "/".to_string()),
        (Method::OPTIONS, format!("/{}", id)),
    ];
    for (method, path) in cases {
        let response = handler
            .handle(ApiRequest::new(method.clone(), path.clone()).with_json(&json!({"stars": 1})))
            .await;
        assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED, "{} {}", method, path);
        assert_eq!(response.error_code(), Some("NOT_IMPLEMENTED"));
    }

    let unchanged = get(&handler, &id).await;
    assert_eq!(unchanged.data_payload().unwrap()["stars"], json!(5));
}

#[tokio::test]
async fn test_malformed_ids_are_not_found() {
    let handler = local_handler();
    for id in ["abc", "TOO-LONG-ID", "health", "a%20b"] {
        assert_eq!(get(&handler, id).await.status, StatusCode::NOT_FOUND, "{}", id);
    }
}

#[tokio::test]
async fn test_envelopes() {
    let handler = local_handler();
    let created = post(&handler, &review_body("Al's Diner", 5, "2024-03-01")).await;
    let body = created.body.as_ref().unwrap().as_object().unwrap();
    assert_eq!(body.len(), 1);
    assert!(body.contains_key("data"));

    let missing = get(&handler, "AAAAA").await;
    let error = &missing.body.as_ref().unwrap()["error"];
    assert_eq!(error["code"], json!("NOT_FOUND"));
    assert!(error["message"].is_string());
}
