use serde::{Deserialize, Serialize};

/// Beeminder 연동 정보 (사용자당 최대 한 행)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BeeminderCredentials {
    pub owner_id: String,
    pub username: String,
    pub auth_token: String,
    pub goal_slug: String,
    pub updated_at: String,
}

impl BeeminderCredentials {
    /// 세 값이 모두 비어 있지 않아야 연결된 것으로 봅니다.
    pub fn is_configured(&self) -> bool {
        !self.username.trim().is_empty()
            && !self.auth_token.trim().is_empty()
            && !self.goal_slug.trim().is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBeeminderRequest {
    pub username: Option<String>,
    pub auth_token: Option<String>,
    pub goal_slug: Option<String>,
}

/// 설정 조회/변경 응답. 토큰은 절대 돌려주지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BeeminderStatus {
    pub connected: bool,
    pub username: Option<String>,
    pub goal_slug: Option<String>,
}

impl BeeminderStatus {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            username: None,
            goal_slug: None,
        }
    }
}

impl From<Option<BeeminderCredentials>> for BeeminderStatus {
    fn from(creds: Option<BeeminderCredentials>) -> Self {
        match creds {
            Some(c) => Self {
                connected: c.is_configured(),
                username: Some(c.username),
                goal_slug: Some(c.goal_slug),
            },
            None => Self::disconnected(),
        }
    }
}
