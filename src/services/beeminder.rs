//! # Beeminder 동기화 어댑터
//!
//! 점수가 난 세션을 Beeminder 목표(goal)의 데이터포인트로 보냅니다.
//!
//! ## 규칙
//! - 연동 정보 세 값(username, auth token, goal slug)이 모두 있어야 보냅니다.
//!   하나라도 비어 있으면 에러가 아니라 아무 일도 하지 않습니다.
//! - `requestid`는 세션 ID로부터 결정됩니다. 같은 세션을 두 번 보내도
//!   Beeminder가 중복으로 세지 않습니다.
//! - `deliver()`는 실패를 로그로만 남기고 재시도하지 않습니다. `Ledger`가 이것을
//!   연동 정보 조회와 함께 별도 태스크로 띄우므로 세션 기록 응답을 늦추지 않습니다.

use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;

use crate::models::BeeminderCredentials;

/// `requestid` 접두사
pub const REQUEST_ID_PREFIX: &str = "hatrack-session-";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid Beeminder URL: {0}")]
    InvalidUrl(String),

    #[error("Beeminder request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Beeminder API error {status}: {body}")]
    Status { status: u16, body: String },
}

/// Beeminder로 보낼 데이터포인트 한 개
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datapoint {
    pub value: i64,
    pub comment: String,
    pub requestid: String,
}

impl Datapoint {
    /// 세션 하나에 대한 데이터포인트를 만듭니다.
    pub fn for_session(session_id: &str, hat_name: &str, score: i64, minutes: i64) -> Self {
        Self {
            value: score,
            comment: format!("{}: {} min focus session", hat_name, minutes),
            requestid: request_id(session_id),
        }
    }
}

/// 같은 세션 ID → 같은 키
pub fn request_id(session_id: &str) -> String {
    format!("{}{}", REQUEST_ID_PREFIX, session_id)
}

/// Beeminder API 클라이언트
///
/// `reqwest::Client`는 내부적으로 Arc이므로 clone해도 연결 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct BeeminderClient {
    http: Client,
    base_url: String,
}

impl BeeminderClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    /// `{base}/users/{username}/goals/{goal}/datapoints.json`
    ///
    /// 사용자 이름과 goal slug는 경로 세그먼트로 인코딩됩니다.
    pub fn datapoints_url(&self, creds: &BeeminderCredentials) -> Result<Url, SyncError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "users",
                creds.username.trim(),
                "goals",
                creds.goal_slug.trim(),
                "datapoints.json",
            ]);
        Ok(url)
    }

    /// 데이터포인트 하나를 form-encoded POST로 보냅니다. 2xx가 아니면 에러입니다.
    pub async fn forward(
        &self,
        creds: &BeeminderCredentials,
        datapoint: &Datapoint,
    ) -> Result<(), SyncError> {
        let url = self.datapoints_url(creds)?;
        let value = datapoint.value.to_string();

        let resp = self
            .http
            .post(url)
            .form(&[
                ("auth_token", creds.auth_token.trim()),
                ("value", value.as_str()),
                ("comment", datapoint.comment.as_str()),
                ("requestid", datapoint.requestid.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// 연동 확인 → 전송 → 결과 로그까지 한 번에 처리합니다. 전송에 성공하면 `true`.
    ///
    /// 연동이 안 돼 있으면 요청 없이 `false`입니다. 에러는 로그로만 남기고 재시도하지 않습니다.
    /// 호출 경로에서는 `Ledger`가 띄운 백그라운드 태스크 안에서만 부릅니다.
    pub async fn deliver(&self, creds: Option<BeeminderCredentials>, datapoint: Datapoint) -> bool {
        let creds = match creds {
            Some(c) if c.is_configured() => c,
            _ => {
                tracing::debug!(requestid = %datapoint.requestid, "Beeminder not configured, skipping sync");
                return false;
            }
        };

        match self.forward(&creds, &datapoint).await {
            Ok(()) => {
                tracing::info!(
                    owner_id = %creds.owner_id,
                    requestid = %datapoint.requestid,
                    value = datapoint.value,
                    "Beeminder datapoint sent"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    owner_id = %creds.owner_id,
                    requestid = %datapoint.requestid,
                    "Beeminder sync failed: {}",
                    e
                );
                false
            }
        }
    }
}
