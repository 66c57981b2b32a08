//! Tests for users API handlers.

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::LINK;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{memory_state, test_app};

async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
) -> (StatusCode, Option<String>, Value) {
    let res = actix_test::call_service(app, request.to_request()).await;
    let status = res.status();
    let link = res
        .headers()
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = actix_test::read_body(res).await;
    let value = serde_json::from_slice(&body).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    });
    (status, link, value)
}

fn user_json(first: &str, last: &str) -> Value {
    json!({ "firstName": first, "lastName": last, "role": "citizen" })
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id present").to_owned()
}

#[rstest]
#[actix_web::test]
async fn create_returns_the_stored_user() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let (status, _, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["role"], "citizen");
    assert!(body.get("createdAt").is_some());
    assert!(body.get("first_name").is_none());
}

#[rstest]
#[actix_web::test]
async fn create_reports_every_invalid_field() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let (status, _, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "firstName": "A", "role": "admin" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    let fields: Vec<&str> = body["details"]["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["firstName", "lastName", "role"]);
}

#[rstest]
#[actix_web::test]
async fn duplicate_names_are_rejected_and_not_stored() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let create = || {
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace"))
    };

    let (first, _, _) = send(&app, create()).await;
    let (second, _, body) = send(&app, create()).await;
    let (_, _, listing) = send(&app, actix_test::TestRequest::get().uri("/users")).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["errors"][0]["code"], "duplicate");
    assert_eq!(listing.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn listing_attaches_issue_counts() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let mut ids = Vec::new();
    for (first, last) in [("Ada", "Adams"), ("Bob", "Brown"), ("Cy", "Clark")] {
        let (_, _, body) = send(
            &app,
            actix_test::TestRequest::post()
                .uri("/users")
                .set_json(user_json(first, last)),
        )
        .await;
        ids.push(id_of(&body));
    }
    for reporter in [&ids[0], &ids[0], &ids[1]] {
        let (status, _, _) = send(
            &app,
            actix_test::TestRequest::post().uri("/issues").set_json(json!({
                "latitude": 10.0,
                "longitude": 10.0,
                "tags": ["bench"],
                "user": reporter,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, listing) = send(&app, actix_test::TestRequest::get().uri("/users")).await;

    assert_eq!(status, StatusCode::OK);
    let counts: Vec<(String, u64)> = listing
        .as_array()
        .expect("array")
        .iter()
        .map(|u| (id_of(u), u["reportedIssueCount"].as_u64().expect("count")))
        .collect();
    assert_eq!(
        counts,
        vec![(ids[0].clone(), 2), (ids[1].clone(), 1), (ids[2].clone(), 0)]
    );
}

#[rstest]
#[actix_web::test]
async fn listing_emits_link_header_across_pages() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    for last in ["Adams", "Brown", "Clark"] {
        send(
            &app,
            actix_test::TestRequest::post()
                .uri("/users")
                .set_json(user_json("Eve", last)),
        )
        .await;
    }

    let (_, link, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/users?page=2&pageSize=1"),
    )
    .await;

    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["lastName"], "Brown");
    let link = link.expect("link header");
    assert!(link.contains("<http://localhost:8080/users?page=1&pageSize=1>; rel=\"first\""));
    assert!(link.contains("<http://localhost:8080/users?page=3&pageSize=1>; rel=\"last\""));
}

#[rstest]
#[actix_web::test]
async fn put_replaces_fields_but_keeps_identity() {
    let (state, clock) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let (_, _, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace")),
    )
    .await;
    let id = id_of(&created);
    clock.advance_seconds(60);

    let (status, _, replaced) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "firstName": "Augusta", "lastName": "King", "role": "manager" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["createdAt"], created["createdAt"]);
    assert_eq!(replaced["lastName"], "King");
    assert_eq!(replaced["role"], "manager");
}

#[rstest]
#[actix_web::test]
async fn put_with_missing_fields_is_rejected() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let (_, _, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace")),
    )
    .await;
    let uri = format!("/users/{}", id_of(&created));

    let (status, _, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "firstName": "Augusta" })),
    )
    .await;
    let (_, _, stored) = send(&app, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["errors"][0]["field"], "lastName");
    assert_eq!(stored["firstName"], "Ada");
}

#[rstest]
#[actix_web::test]
async fn patch_ignores_fields_outside_the_whitelist() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let (_, _, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace")),
    )
    .await;
    let uri = format!("/users/{}", id_of(&created));

    let (status, _, patched) = send(
        &app,
        actix_test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "id": "forged", "createdAt": "1999-01-01T00:00:00Z" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, created);
}

#[rstest]
#[actix_web::test]
async fn patch_updates_whitelisted_fields() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let (_, _, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace")),
    )
    .await;

    let (status, _, patched) = send(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/users/{}", id_of(&created)))
            .set_json(json!({ "role": "manager" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["role"], "manager");
    assert_eq!(patched["firstName"], "Ada");
}

#[rstest]
#[actix_web::test]
async fn delete_removes_the_user() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let (_, _, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(user_json("Ada", "Lovelace")),
    )
    .await;
    let id = id_of(&created);
    let uri = format!("/users/{id}");

    let (deleted, _, _) = send(&app, actix_test::TestRequest::delete().uri(&uri)).await;
    let (status, _, body) = send(&app, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::String(format!("No user found with ID {id}")));
}

#[rstest]
#[case("/users/not-a-valid-id", "not-a-valid-id")]
#[case(
    "/users/0f8fad5b-d9cb-469f-a165-70867728950e",
    "0f8fad5b-d9cb-469f-a165-70867728950e"
)]
#[actix_web::test]
async fn unknown_users_are_not_found(#[case] uri: &str, #[case] id: &str) {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let (status, _, body) = send(&app, actix_test::TestRequest::delete().uri(uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::String(format!("No user found with ID {id}")));
}

#[rstest]
#[actix_web::test]
async fn user_issues_lists_only_their_reports() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    let mut ids = Vec::new();
    for last in ["Adams", "Brown"] {
        let (_, _, body) = send(
            &app,
            actix_test::TestRequest::post()
                .uri("/users")
                .set_json(user_json("Eve", last)),
        )
        .await;
        ids.push(id_of(&body));
    }
    for reporter in &ids {
        send(
            &app,
            actix_test::TestRequest::post().uri("/issues").set_json(json!({
                "latitude": 1.0,
                "longitude": 1.0,
                "tags": ["graffiti"],
                "user": reporter,
            })),
        )
        .await;
    }

    let (status, link, body) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/users/{}/issues", ids[0])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(link.is_none());
    let reporters: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|i| i["user"].as_str())
        .collect();
    assert_eq!(reporters, vec![ids[0].as_str()]);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let (status, _, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
