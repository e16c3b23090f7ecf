mod common;

use std::time::Duration;

use common::{spawn_app, wait_until_matched, UNREACHABLE};
use mockito::Matcher;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_hat(app: &common::TestApp, user: &str, name: &str) -> Value {
    let resp = app
        .post(user, "/hats")
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn health_is_public_and_everything_else_needs_a_token() {
    let app = spawn_app(UNREACHABLE).await;

    let resp = app.http.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "status": "ok" }));

    let resp = app.http.get(app.url("/hats")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "missing_token");

    let resp = app
        .http
        .get(app.url("/sessions/score"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_token");
}

#[tokio::test]
async fn hat_crud_is_scoped_to_the_owner() {
    let app = spawn_app(UNREACHABLE).await;

    let hat = create_hat(&app, "alice", "  Writing ").await;
    assert_eq!(hat["name"], "Writing");
    assert_eq!(hat["done"], false);
    assert!(hat["doneAt"].is_null());
    assert!(hat.get("deletedAt").is_none());
    let id = hat["id"].as_str().unwrap().to_string();

    for body in [json!({ "name": "   " }), json!({})] {
        let resp = app.post("alice", "/hats").json(&body).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let resp = app
        .patch("alice", &format!("/hats/{id}"))
        .json(&json!({ "done": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let done: Value = resp.json().await.unwrap();
    assert_eq!(done["done"], true);
    assert!(done["doneAt"].is_string());

    let resp = app
        .patch("alice", &format!("/hats/{id}"))
        .json(&json!({ "done": false, "name": "Morning pages" }))
        .send()
        .await
        .unwrap();
    let undone: Value = resp.json().await.unwrap();
    assert_eq!(undone["done"], false);
    assert!(undone["doneAt"].is_null());
    assert_eq!(undone["name"], "Morning pages");

    let resp = app
        .patch("alice", &format!("/hats/{id}"))
        .json(&json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 남의 모자는 존재하지 않는 것과 같습니다
    let resp = app
        .patch("bob", &format!("/hats/{id}"))
        .json(&json!({ "done": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app.delete("bob", &format!("/hats/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let bobs: Vec<Value> = app.get("bob", "/hats").send().await.unwrap().json().await.unwrap();
    assert!(bobs.is_empty());

    let resp = app.delete("alice", &format!("/hats/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "ok": true }));
    let resp = app.delete("alice", &format!("/hats/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let hats: Vec<Value> = app.get("alice", "/hats?tz=-540").send().await.unwrap().json().await.unwrap();
    assert!(hats.is_empty());
}

#[tokio::test]
async fn hats_list_in_creation_order() {
    let app = spawn_app(UNREACHABLE).await;
    for name in ["Writing", "Piano", "Running"] {
        create_hat(&app, "alice", name).await;
    }
    let hats: Vec<Value> = app.get("alice", "/hats?tz=garbage").send().await.unwrap().json().await.unwrap();
    let names: Vec<&str> = hats.iter().map(|h| h["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Writing", "Piano", "Running"]);
}

#[tokio::test]
async fn sessions_record_list_score_and_clear() {
    let app = spawn_app(UNREACHABLE).await;
    let hat = create_hat(&app, "alice", "Writing").await;
    let hat_id = hat["id"].as_str().unwrap();

    let resp = app
        .post("alice", "/sessions")
        .json(&json!({ "durationSeconds": 420, "score": 7, "hatId": hat_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let session: Value = resp.json().await.unwrap();
    assert_eq!(session["score"], 7);
    assert_eq!(session["durationSeconds"], 420);
    assert_eq!(session["hatId"], hat_id);

    for body in [
        json!({ "durationSeconds": 60, "hatId": hat_id }),
        json!({ "durationSeconds": -1, "score": 0, "hatId": hat_id }),
        json!({ "durationSeconds": 60, "score": -3, "hatId": hat_id }),
        json!({ "durationSeconds": 60, "score": 1 }),
    ] {
        let resp = app.post("alice", "/sessions").json(&body).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
    }

    let resp = app
        .post("bob", "/sessions")
        .json(&json!({ "durationSeconds": 60, "score": 1, "hatId": hat_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let list: Vec<Value> = app.get("alice", "/sessions").send().await.unwrap().json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["hat"]["name"], "Writing");

    let score: Value = app
        .get("alice", "/sessions/score?tz=-540")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(score, json!({ "totalScore": 7, "todayScore": 7 }));

    let bob: Value = app.get("bob", "/sessions/score").send().await.unwrap().json().await.unwrap();
    assert_eq!(bob, json!({ "totalScore": 0, "todayScore": 0 }));

    let cleared: Value = app.delete("alice", "/sessions").send().await.unwrap().json().await.unwrap();
    assert_eq!(cleared, json!({ "deleted": 1 }));
    let score: Value = app.get("alice", "/sessions/score").send().await.unwrap().json().await.unwrap();
    assert_eq!(score, json!({ "totalScore": 0, "todayScore": 0 }));
}

#[tokio::test]
async fn beeminder_settings_never_return_the_token() {
    let app = spawn_app(UNREACHABLE).await;

    let status: Value = app.get("alice", "/settings/beeminder").send().await.unwrap().json().await.unwrap();
    assert_eq!(status["connected"], false);

    let resp = app
        .put("alice", "/settings/beeminder")
        .json(&json!({ "username": "alice", "authToken": "tok", "goalSlug": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .put("alice", "/settings/beeminder")
        .json(&json!({ "username": " alice ", "authToken": "tok", "goalSlug": "focus" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "connected": true, "username": "alice", "goalSlug": "focus" })
    );

    let text = app.get("alice", "/settings/beeminder").send().await.unwrap().text().await.unwrap();
    assert!(!text.contains("tok\""));
    let status: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(status["connected"], true);

    // 다른 사용자에게는 보이지 않습니다
    let bob: Value = app.get("bob", "/settings/beeminder").send().await.unwrap().json().await.unwrap();
    assert_eq!(bob["connected"], false);

    let gone: Value = app.delete("alice", "/settings/beeminder").send().await.unwrap().json().await.unwrap();
    assert_eq!(gone["connected"], false);
    let status: Value = app.get("alice", "/settings/beeminder").send().await.unwrap().json().await.unwrap();
    assert_eq!(status["connected"], false);
}

#[tokio::test]
async fn scored_session_is_forwarded_and_sync_failure_is_invisible() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/users/alice-bm/goals/focus/datapoints.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("auth_token".into(), "tok".into()),
            Matcher::UrlEncoded("value".into(), "12".into()),
            Matcher::UrlEncoded("comment".into(), "Writing: 12 min focus session".into()),
            Matcher::Regex("requestid=hatrack-session-".into()),
        ]))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let app = spawn_app(&server.url()).await;
    app.put("alice", "/settings/beeminder")
        .json(&json!({ "username": "alice-bm", "authToken": "tok", "goalSlug": "focus" }))
        .send()
        .await
        .unwrap();
    let hat = create_hat(&app, "alice", "Writing").await;

    let resp = app
        .post("alice", "/sessions")
        .json(&json!({ "durationSeconds": 720, "score": 12, "hatId": hat["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    wait_until_matched(&mock).await;
    mock.assert_async().await;

    let list: Vec<Value> = app.get("alice", "/sessions").send().await.unwrap().json().await.unwrap();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn zero_score_sessions_are_not_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = spawn_app(&server.url()).await;
    app.put("alice", "/settings/beeminder")
        .json(&json!({ "username": "alice-bm", "authToken": "tok", "goalSlug": "focus" }))
        .send()
        .await
        .unwrap();
    let hat = create_hat(&app, "alice", "Writing").await;

    let resp = app
        .post("alice", "/sessions")
        .json(&json!({ "durationSeconds": 95, "score": 0, "hatId": hat["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    tokio::time::sleep(Duration::from_millis(200)).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_bodies_are_400_with_the_error_envelope() {
    let app = spawn_app(UNREACHABLE).await;
    let hat = create_hat(&app, "alice", "Writing").await;
    let hat_id = hat["id"].as_str().unwrap();

    let resp = app
        .post("alice", "/sessions")
        .json(&json!({ "durationSeconds": "abc", "score": 1, "hatId": hat_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"].is_string());

    let resp = app
        .patch("alice", &format!("/hats/{hat_id}"))
        .json(&json!({ "done": "yes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    // Content-Type 없이 보낸 본문
    let resp = app
        .put("alice", "/settings/beeminder")
        .body("username=alice")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    // 아무것도 기록되지 않았습니다
    let list: Vec<Value> = app.get("alice", "/sessions").send().await.unwrap().json().await.unwrap();
    assert!(list.is_empty());
}
