//! # "오늘"의 경계 계산
//!
//! 클라이언트가 보낸 시간대 오프셋(분)으로 "현지 자정"에 해당하는 UTC 시각을 구합니다.
//! 점수 집계(오늘 점수)와 모자의 일일 자동 해제가 모두 이 값을 기준으로 합니다.
//!
//! 오프셋은 브라우저의 `Date.getTimezoneOffset()` 규약을 따릅니다.
//! 즉 `UTC = 현지 + offset` 이므로 UTC+9(서울)는 `-540`입니다.
//!
//! 서버는 오프셋을 저장하지 않습니다. 요청마다 받은 값으로 다시 계산합니다.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// 허용하는 오프셋의 절댓값(분). 이를 넘으면 잘못된 값으로 보고 UTC로 처리합니다.
pub const MAX_OFFSET_MINUTES: i64 = 24 * 60;

/// DB에 저장하는 타임스탬프 형식.
///
/// 고정 폭 형식이라 문자열 비교가 곧 시간 비교가 됩니다.
pub const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// `?tz=` 쿼리 값을 오프셋(분)으로 해석합니다.
///
/// 없거나, 비어 있거나, 숫자가 아니거나, 범위를 벗어나면 0(UTC)입니다.
/// 요청을 실패시키지 않습니다.
pub fn parse_offset(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|m| m.abs() <= MAX_OFFSET_MINUTES)
        .unwrap_or(0)
}

/// `now`를 기준으로 호출자의 현지 날짜가 시작된 UTC 시각을 반환합니다.
///
/// 1. `now - offset`으로 현지 시각을 만들고
/// 2. 그 날짜(연/월/일)만 취해 자정을 UTC로 다시 조립한 뒤
/// 3. `offset`을 더해 실제 UTC 시각으로 되돌립니다.
///
/// 오프셋 때문에 UTC 날짜가 바뀌는 경우(예: UTC 02:00, UTC+9)에도 올바른 값을 줍니다.
pub fn local_day_start(now: DateTime<Utc>, offset_minutes: i64) -> DateTime<Utc> {
    let offset = Duration::minutes(offset_minutes.clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES));
    let local_now = now - offset;
    let local_midnight = local_now.date_naive().and_time(NaiveTime::MIN).and_utc();
    local_midnight + offset
}

/// DB 저장용 문자열로 변환합니다.
pub fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.format(DB_TIMESTAMP_FORMAT).to_string()
}
