//! Router-level wire tests: envelopes, naming conventions, status codes.

use crate::harness::TestEnv;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use covenant_crypto::Keypair;
use covenant_gateway::{GatewayConfig, GatewayService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(env: &TestEnv) -> Router {
    GatewayService::new(GatewayConfig::default(), Arc::clone(&env.service)).build_router()
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Create a two-party contract over HTTP; returns (uuid, stepId).
async fn create_contract_http(
    env: &TestEnv,
    router: &Router,
    creator: &Keypair,
    other: &Keypair,
) -> (String, String) {
    let auth = env.auth(creator, "user-creator", None);
    let body = json!({
        "signature": auth.signature,
        "timestamp": auth.timestamp,
        "userUUID": auth.user_uuid,
        "pubKey": auth.pub_key,
        "title": "Wire deal",
        "description": "over http",
        "participants": [creator.public_key_hex(), other.public_key_hex()],
        "steps": [{"description": "Ship it"}]
    });
    let (status, response) = send(router, Method::POST, "/contract", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);
    let contract = &response["data"];
    (
        contract["uuid"].as_str().unwrap().to_string(),
        contract["steps"][0]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_reports_service_identity() {
    let env = TestEnv::new();
    let (status, body) = send(&router(&env), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "covenant");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].as_str().is_some());
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn user_create_and_fetch_roundtrip() {
    let env = TestEnv::new();
    let router = router(&env);
    let keypair = Keypair::generate();

    let timestamp = covenant_core::domain::time::epoch_millis();
    let signature = keypair.sign(&format!("{timestamp}{}", keypair.public_key_hex()));
    let body = json!({
        "timestamp": timestamp,
        "pubKey": keypair.public_key_hex(),
        "signature": signature,
    });
    let (status, response) = send(&router, Method::PUT, "/user/create", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    let uuid = response["data"]["uuid"].as_str().unwrap().to_string();

    let timestamp = covenant_core::domain::time::epoch_millis();
    let signature = keypair.sign(&format!("{timestamp}{uuid}"));
    let uri = format!("/user/{uuid}?timestamp={timestamp}&signature={signature}");
    let (status, response) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["pubKey"], keypair.public_key_hex());
}

#[tokio::test]
async fn contract_document_uses_camel_case_wire_form() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let (uuid, _) = create_contract_http(&env, &router, &alice, &bob).await;

    let (status, response) = send(&router, Method::GET, &format!("/contract/{uuid}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let contract = &response["data"];
    assert!(contract.get("createdAt").is_some());
    assert!(contract.get("updatedAt").is_some());
    assert!(contract.get("pubKey").is_some());
    assert!(contract.get("created_at").is_none());
}

#[tokio::test]
async fn create_with_one_participant_is_400() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let body = json!({
        "signature": auth.signature,
        "timestamp": auth.timestamp,
        "userUUID": auth.user_uuid,
        "pubKey": auth.pub_key,
        "title": "Solo",
        "participants": [alice.public_key_hex()],
        "steps": [{"description": "Ship it"}]
    });
    let (status, response) = send(&router, Method::POST, "/contract", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert!(response["error"].as_str().unwrap().contains("participants"));
}

#[tokio::test]
async fn non_participant_sign_is_403_wire() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let carol = Keypair::generate();
    let (uuid, step_id) = create_contract_http(&env, &router, &alice, &bob).await;

    let auth = env.auth(&carol, "user-carol", Some(&uuid));
    let sig = env.step_signature(&carol, &auth, &uuid, &step_id);
    let body = json!({
        "signature": auth.signature,
        "timestamp": auth.timestamp,
        "userUUID": auth.user_uuid,
        "pubKey": auth.pub_key,
        "stepId": step_id,
        "stepSignature": sig.step_signature,
    });
    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/contract/{uuid}/sign"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn forged_step_signature_is_401_wire() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let (uuid, step_id) = create_contract_http(&env, &router, &alice, &bob).await;

    let auth = env.auth(&alice, "user-alice", Some(&uuid));
    let forged = env.step_signature(&bob, &auth, &uuid, &step_id);
    let body = json!({
        "signature": auth.signature,
        "timestamp": auth.timestamp,
        "userUUID": auth.user_uuid,
        "pubKey": auth.pub_key,
        "stepId": step_id,
        "stepSignature": forged.step_signature,
    });
    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/contract/{uuid}/sign"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_contract_is_404() {
    let env = TestEnv::new();
    let (status, response) = send(
        &router(&env),
        Method::GET,
        "/contract/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn delete_requires_creator() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let (uuid, _) = create_contract_http(&env, &router, &alice, &bob).await;

    // Bob participates but did not create.
    let auth = env.auth(&bob, "user-bob", Some(&uuid));
    let body = json!({
        "signature": auth.signature,
        "timestamp": auth.timestamp,
        "userUUID": auth.user_uuid,
        "pubKey": auth.pub_key,
    });
    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/contract/{uuid}"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let auth = env.auth(&alice, "user-creator", Some(&uuid));
    let body = json!({
        "signature": auth.signature,
        "timestamp": auth.timestamp,
        "userUUID": auth.user_uuid,
        "pubKey": auth.pub_key,
    });
    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/contract/{uuid}"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, Method::GET, &format!("/contract/{uuid}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_participant() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let carol = Keypair::generate();
    create_contract_http(&env, &router, &alice, &bob).await;
    create_contract_http(&env, &router, &alice, &carol).await;

    let (status, response) = send(&router, Method::GET, "/contracts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"].as_array().unwrap().len(), 2);

    let uri = format!("/contracts?participant={}", bob.public_key_hex());
    let (status, response) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_spell_fails_with_code_900_in_body() {
    let env = TestEnv::new();
    let body = json!({
        "components": {},
        "timestamp": "1",
        "casterSignature": "ab",
    });
    let (status, response) = send(
        &router(&env),
        Method::POST,
        "/magic/spell/fireball",
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], false);
    assert_eq!(response["code"], 900);
}

#[tokio::test]
async fn purchase_lesson_spell_creates_template_contract() {
    let env = TestEnv::new();
    let router = router(&env);
    let teacher = Keypair::generate();
    let student = Keypair::generate();

    // The resolver verified the caster; the signature must still satisfy
    // the gate's canonical message.
    let auth = env.auth(&student, "user-student", None);
    let body = json!({
        "components": {
            "userUUID": auth.user_uuid,
            "teacherPubKey": teacher.public_key_hex(),
            "studentPubKey": student.public_key_hex(),
            "lessonTitle": "Violin",
            "amount": 100,
        },
        "timestamp": auth.timestamp,
        "casterSignature": auth.signature,
    });
    let (status, response) = send(
        &router,
        Method::POST,
        "/magic/spell/purchaseLesson",
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);
    let contract = &response["data"];
    assert_eq!(contract["title"], "Lesson: Violin");
    assert_eq!(contract["steps"].as_array().unwrap().len(), 5);
    assert_eq!(contract["steps"][3]["magicSpell"]["type"], "payment");
}

#[tokio::test]
async fn contract_sign_spell_runs_the_same_protocol() {
    let env = TestEnv::new();
    let router = router(&env);
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let (uuid, step_id) = create_contract_http(&env, &router, &alice, &bob).await;

    for (keypair, user) in [(&alice, "user-alice"), (&bob, "user-bob")] {
        let auth = env.auth(keypair, user, Some(&uuid));
        let sig = env.step_signature(keypair, &auth, &uuid, &step_id);
        let body = json!({
            "components": {
                "userUUID": auth.user_uuid,
                "pubKey": auth.pub_key,
                "contractUUID": uuid,
                "stepId": step_id,
                "stepSignature": sig.step_signature,
            },
            "timestamp": auth.timestamp,
            "casterSignature": auth.signature,
        });
        let (status, response) = send(
            &router,
            Method::POST,
            "/magic/spell/contractSign",
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);
    }

    let (_, response) = send(&router, Method::GET, &format!("/contract/{uuid}"), None).await;
    assert_eq!(response["data"]["steps"][0]["completed"], true);
}
