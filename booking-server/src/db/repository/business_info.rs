//! Business Info Repository

use super::RepoResult;
use shared::models::BusinessInfo;
use sqlx::SqlitePool;

/// The singleton row (id = 1), None when the tenant was never configured
pub async fn get(pool: &SqlitePool) -> RepoResult<Option<BusinessInfo>> {
    let info = sqlx::query_as::<_, BusinessInfo>(
        "SELECT id, name, phone, email, opening_time, closing_time, active_opening_time, active_closing_time, closing_days, booking_max_duration_min, duration_rule, duration_rule_message, booking_max_price_cents, price_rule, price_rule_message, reminder_enabled, reminder_time, reminder_template, agenda_enabled, agenda_time, agenda_template, created_at, updated_at FROM business_info WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(info)
}

/// Insert or replace the singleton row. Seeding and tests only.
pub async fn save(pool: &SqlitePool, info: &BusinessInfo) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let closing_days = serde_json::to_string(&info.closing_days)
        .unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        "INSERT OR REPLACE INTO business_info (
            id, name, phone, email, opening_time, closing_time,
            active_opening_time, active_closing_time, closing_days,
            booking_max_duration_min, duration_rule, duration_rule_message,
            booking_max_price_cents, price_rule, price_rule_message,
            reminder_enabled, reminder_time, reminder_template,
            agenda_enabled, agenda_time, agenda_template, created_at, updated_at
        ) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&info.name)
    .bind(&info.phone)
    .bind(&info.email)
    .bind(&info.opening_time)
    .bind(&info.closing_time)
    .bind(&info.active_opening_time)
    .bind(&info.active_closing_time)
    .bind(closing_days)
    .bind(info.booking_max_duration_min)
    .bind(info.duration_rule)
    .bind(&info.duration_rule_message)
    .bind(info.booking_max_price_cents)
    .bind(info.price_rule)
    .bind(&info.price_rule_message)
    .bind(info.reminder_enabled)
    .bind(&info.reminder_time)
    .bind(&info.reminder_template)
    .bind(info.agenda_enabled)
    .bind(&info.agenda_time)
    .bind(&info.agenda_template)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::GuardRailMode;

    fn sample() -> BusinessInfo {
        BusinessInfo {
            id: 1,
            name: "Salone Bella".to_string(),
            phone: Some("+39 055 123456".to_string()),
            email: None,
            opening_time: "09:00".to_string(),
            closing_time: "19:00".to_string(),
            active_opening_time: "08:30".to_string(),
            active_closing_time: "19:30".to_string(),
            closing_days: vec!["Sunday".to_string()],
            booking_max_duration_min: Some(180),
            duration_rule: GuardRailMode::Warning,
            duration_rule_message: Some("Long sessions are confirmed by phone".to_string()),
            booking_max_price_cents: None,
            price_rule: GuardRailMode::None,
            price_rule_message: None,
            reminder_enabled: true,
            reminder_time: "08:00".to_string(),
            reminder_template: None,
            agenda_enabled: false,
            agenda_time: "20:30".to_string(),
            agenda_template: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_get_missing() {
        let pool = crate::db::memory_pool().await;
        assert!(get(&pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let pool = crate::db::memory_pool().await;
        save(&pool, &sample()).await.unwrap();

        let loaded = get(&pool).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Salone Bella");
        assert_eq!(loaded.closing_days, vec!["Sunday".to_string()]);
        assert_eq!(loaded.duration_rule, GuardRailMode::Warning);
        assert_eq!(loaded.booking_max_duration_min, Some(180));
        assert_eq!(loaded.active_opening_time, "08:30");
    }
}
