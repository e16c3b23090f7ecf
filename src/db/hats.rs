//! # 모자(Hat) 데이터베이스 쿼리 모듈
//!
//! 모든 쿼리는 `owner_id`로 범위가 제한되고, `deleted_at IS NULL`인 행만 다룹니다.
//! 삭제는 `deleted_at`을 채우는 soft-delete이며 행은 지워지지 않습니다
//! (과거 세션이 모자 이름을 계속 참조할 수 있어야 하기 때문).
//!
//! ## 일일 자동 해제
//! `list_hats_for_day()`는 목록을 읽기 전에 같은 트랜잭션에서
//! "오늘 경계 이전에 체크된" 모자의 `done`/`done_at`을 지웁니다.
//! 조건부 UPDATE(`done_at < ?`)라서 같은 날 두 번 불러도 아무것도 바뀌지 않고,
//! 경계 이후에 체크된 모자는 건드리지 않습니다.

use crate::error::AppError;
use crate::models::Hat;
use sqlx::SqlitePool;

const HAT_COLUMNS: &str = "id, owner_id, name, done, done_at, deleted_at, created_at";

/// 오래된 체크 표시를 해제한 뒤, 삭제되지 않은 모자 목록을 생성순으로 반환합니다.
///
/// `day_start`는 호출자의 현지 자정(UTC, DB 타임스탬프 형식)입니다.
pub async fn list_hats_for_day(
    pool: &SqlitePool,
    owner_id: &str,
    day_start: &str,
) -> Result<Vec<Hat>, AppError> {
    // reset → read 를 하나의 스냅샷으로 묶습니다
    let mut tx = pool.begin().await?;

    let reset = sqlx::query(
        r#"
        UPDATE hats
        SET done = 0, done_at = NULL
        WHERE owner_id = ?
          AND deleted_at IS NULL
          AND done = 1
          AND done_at < ?
        "#,
    )
    .bind(owner_id)
    .bind(day_start)
    .execute(&mut *tx)
    .await?;

    if reset.rows_affected() > 0 {
        tracing::debug!(
            owner_id,
            reset = reset.rows_affected(),
            "cleared hats checked before {}",
            day_start
        );
    }

    let hats = sqlx::query_as::<_, Hat>(&format!(
        "SELECT {HAT_COLUMNS} FROM hats WHERE owner_id = ? AND deleted_at IS NULL ORDER BY id ASC"
    ))
    .bind(owner_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(hats)
}

/// 호출자 소유이고 삭제되지 않은 모자 하나를 조회합니다.
///
/// 없거나 남의 것이거나 삭제된 경우 모두 `None`입니다.
pub async fn get_hat(pool: &SqlitePool, owner_id: &str, id: &str) -> Result<Option<Hat>, AppError> {
    let hat = sqlx::query_as::<_, Hat>(&format!(
        "SELECT {HAT_COLUMNS} FROM hats WHERE id = ? AND owner_id = ? AND deleted_at IS NULL"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(hat)
}

/// 새 모자를 생성합니다. `name`은 호출 전에 검증·trim된 값이어야 합니다.
pub async fn create_hat(
    pool: &SqlitePool,
    owner_id: &str,
    name: &str,
    now: &str,
) -> Result<Hat, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO hats (id, owner_id, name, done, created_at)
        VALUES (?, ?, ?, 0, ?)
        "#,
    )
    .bind(&id)
    .bind(owner_id)
    .bind(name)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Hat"))?;

    get_hat(pool, owner_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created hat".to_string()))
}

/// 이름 또는 완료 여부를 바꿉니다.
///
/// `done`과 `done_at`은 항상 한 UPDATE 안에서 함께 바뀝니다:
/// - `done = true`: 이미 체크돼 있으면 기존 `done_at` 유지, 아니면 `now`
/// - `done = false`: `done_at = NULL`
///
/// ## 반환값
/// - `Ok(Some(Hat))`: 변경된 모자
/// - `Ok(None)`: 없거나 남의 것이거나 삭제됨
pub async fn update_hat(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
    name: Option<&str>,
    done: Option<bool>,
    now: &str,
) -> Result<Option<Hat>, AppError> {
    let mut tx = pool.begin().await?;

    let exists: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM hats WHERE id = ? AND owner_id = ? AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?;
    if exists.is_none() {
        return Ok(None);
    }

    if let Some(name) = name {
        sqlx::query("UPDATE hats SET name = ? WHERE id = ? AND owner_id = ? AND deleted_at IS NULL")
            .bind(name)
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(done) = done {
        // SET 절의 우변은 갱신 전 값을 봅니다
        sqlx::query(
            r#"
            UPDATE hats
            SET done = ?1,
                done_at = CASE
                    WHEN ?1 = 0 THEN NULL
                    WHEN done = 1 AND done_at IS NOT NULL THEN done_at
                    ELSE ?2
                END
            WHERE id = ?3 AND owner_id = ?4 AND deleted_at IS NULL
            "#,
        )
        .bind(done)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    get_hat(pool, owner_id, id).await
}

/// 모자를 soft-delete 합니다. 관련 세션은 그대로 둡니다.
///
/// 이미 삭제됐거나 없는 모자면 `false`.
pub async fn soft_delete_hat(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
    now: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE hats SET deleted_at = ? WHERE id = ? AND owner_id = ? AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
