#![allow(dead_code)]

use std::time::Duration;

use hatrack::{
    db,
    middleware::auth::create_access_token,
    routes::{self, AppState},
    services::beeminder::BeeminderClient,
};
use reqwest::{Client, RequestBuilder};
use sqlx::SqlitePool;
use tokio::net::TcpListener;

pub const SECRET: &str = "integration-secret";

/// 닫힌 포트. Beeminder 호출이 없어야 하는 테스트에서 씁니다.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub struct TestApp {
    pub base: String,
    pub pool: SqlitePool,
    pub http: Client,
}

/// 인메모리 DB로 라우터를 띄웁니다. 포트는 OS가 고릅니다.
pub async fn spawn_app(beeminder_url: &str) -> TestApp {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    let sync = BeeminderClient::new(beeminder_url, Duration::from_secs(2)).unwrap();
    let state = AppState {
        pool: pool.clone(),
        jwt_secret: SECRET.to_string(),
        sync,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state)).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}/api"),
        pool,
        http: Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn token(user: &str) -> String {
        create_access_token(user, SECRET, chrono::Duration::hours(1)).unwrap()
    }

    pub fn get(&self, user: &str, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(Self::token(user))
    }

    pub fn post(&self, user: &str, path: &str) -> RequestBuilder {
        self.http.post(self.url(path)).bearer_auth(Self::token(user))
    }

    pub fn patch(&self, user: &str, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path)).bearer_auth(Self::token(user))
    }

    pub fn put(&self, user: &str, path: &str) -> RequestBuilder {
        self.http.put(self.url(path)).bearer_auth(Self::token(user))
    }

    pub fn delete(&self, user: &str, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path)).bearer_auth(Self::token(user))
    }
}

/// 백그라운드 전송이 목 서버에 닿을 때까지 기다립니다.
pub async fn wait_until_matched(mock: &mockito::Mock) {
    for _ in 0..100 {
        if mock.matched_async().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
