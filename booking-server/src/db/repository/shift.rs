//! Operator Shift Repository

use super::{RepoError, RepoResult};
use shared::models::{OperatorShift, OperatorShiftCreate};
use sqlx::SqlitePool;

/// All shift rows for one date, grouped by caller
pub async fn find_by_date(pool: &SqlitePool, date: &str) -> RepoResult<Vec<OperatorShift>> {
    let shifts = sqlx::query_as::<_, OperatorShift>(
        "SELECT id, operator_id, shift_date, start_time, end_time, created_at FROM operator_shift WHERE shift_date = ? ORDER BY operator_id, start_time",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(shifts)
}

/// Insert a shift row. Seeding and tests only.
pub async fn create(pool: &SqlitePool, data: OperatorShiftCreate) -> RepoResult<OperatorShift> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO operator_shift (operator_id, shift_date, start_time, end_time, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.operator_id)
    .bind(&data.shift_date)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    let shift = sqlx::query_as::<_, OperatorShift>(
        "SELECT id, operator_id, shift_date, start_time, end_time, created_at FROM operator_shift WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    shift.ok_or_else(|| RepoError::Database("Failed to create shift".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::operator;
    use shared::models::OperatorCreate;

    #[tokio::test]
    async fn test_find_by_date() {
        let pool = crate::db::memory_pool().await;
        let op = operator::create(
            &pool,
            OperatorCreate {
                name: "Anna".to_string(),
                kind: None,
                phone: None,
                is_visible: None,
                notify_shifts: None,
            },
        )
        .await
        .unwrap();

        for (date, start, end) in [
            ("2025-06-02", "09:00", "13:00"),
            ("2025-06-02", "15:00", "19:00"),
            ("2025-06-03", "09:00", "18:00"),
        ] {
            create(
                &pool,
                OperatorShiftCreate {
                    operator_id: op.id,
                    shift_date: date.to_string(),
                    start_time: start.to_string(),
                    end_time: end.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let monday = find_by_date(&pool, "2025-06-02").await.unwrap();
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].start_time, "09:00");
        assert_eq!(monday[1].start_time, "15:00");

        assert!(find_by_date(&pool, "2025-06-04").await.unwrap().is_empty());
    }
}
