use super::*;
use uuid::Uuid;

/// Three rows under one session: one years in the past, two on DATE.
async fn seed_mixed_session(pool: &SqlitePool) -> String {
    let anna = seed_operator(pool, "Anna").await;
    let session = Uuid::new_v4().to_string();
    seed_appointment(
        pool,
        Some(anna),
        "2020-01-06",
        "10:00",
        30,
        AppointmentKind::Booked,
        Some(&session),
    )
    .await;
    seed_appointment(pool, Some(anna), DATE, "10:00", 30, AppointmentKind::Booked, Some(&session))
        .await;
    seed_appointment(pool, Some(anna), DATE, "10:30", 45, AppointmentKind::Booked, Some(&session))
        .await;
    session
}

#[tokio::test]
async fn test_preview_counts_only_future_rows() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;
    let session = seed_mixed_session(&pool).await;

    let preview = preview_cancellation(&pool, rome(), &session).await.unwrap();
    assert_eq!(preview.cancellable_count, 2);
    assert_eq!(preview.first_date.as_deref(), Some(DATE));
    assert_eq!(preview.first_time.as_deref(), Some("10:00"));

    // Preview never mutates
    let rows = appointment::find_by_session(&pool, &session).await.unwrap();
    assert!(rows.iter().all(|r| !r.is_cancelled_by_client));
}

#[tokio::test]
async fn test_confirm_cancels_future_and_keeps_past() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;
    let session = seed_mixed_session(&pool).await;

    let outcome = confirm_cancellation(&pool, &session).await.unwrap();
    assert_eq!(outcome.cancelled_count, 2);

    let rows = appointment::find_by_session(&pool, &session).await.unwrap();
    assert_eq!(rows.len(), 3);
    let (past, future): (Vec<_>, Vec<_>) =
        rows.iter().partition(|r| r.start_time < shared::util::now_millis());
    assert!(past.iter().all(|r| !r.is_cancelled_by_client));
    assert!(future.iter().all(|r| r.is_cancelled_by_client));
}

#[tokio::test]
async fn test_repeat_confirm_cancels_nothing_more() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;
    let session = seed_mixed_session(&pool).await;

    let first = confirm_cancellation(&pool, &session).await.unwrap();
    assert_eq!(first.cancelled_count, 2);
    let second = confirm_cancellation(&pool, &session).await.unwrap();
    assert_eq!(second.cancelled_count, 0);

    // The preview agrees after the fact
    let preview = preview_cancellation(&pool, rome(), &session).await.unwrap();
    assert_eq!(preview.cancellable_count, 0);
    assert!(preview.first_date.is_none());
}

#[tokio::test]
async fn test_garbage_token_never_reaches_the_database() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;

    let err = preview_cancellation(&pool, rome(), "not-a-uuid").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionNotFound);

    let err = confirm_cancellation(&pool, "'; DROP TABLE appointment; --")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionNotFound);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;
    let token = Uuid::new_v4().to_string();

    let err = preview_cancellation(&pool, rome(), &token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionNotFound);
    let err = confirm_cancellation(&pool, &token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionNotFound);
}

#[tokio::test]
async fn test_all_past_session_is_found_with_zero_cancellable() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;
    let anna = seed_operator(&pool, "Anna").await;
    let session = Uuid::new_v4().to_string();
    seed_appointment(
        &pool,
        Some(anna),
        "2020-01-06",
        "09:00",
        30,
        AppointmentKind::Booked,
        Some(&session),
    )
    .await;

    let preview = preview_cancellation(&pool, rome(), &session).await.unwrap();
    assert_eq!(preview.cancellable_count, 0);
    assert!(preview.first_date.is_none());
    assert!(preview.first_time.is_none());

    let outcome = confirm_cancellation(&pool, &session).await.unwrap();
    assert_eq!(outcome.cancelled_count, 0);
}

#[tokio::test]
async fn test_commit_then_cancel_round_trip() {
    let pool = crate::db::memory_pool().await;
    seed_studio(&pool).await;
    let anna = seed_operator(&pool, "Anna").await;
    let taglio = seed_service(&pool, "Taglio", 30, 2500, &[anna]).await;
    let piega = seed_service(&pool, "Piega", 45, 1500, &[anna]).await;

    let payload = booking("10:00", vec![request(taglio), request(piega)], vec![anna, anna]);
    let confirmation = commit_booking(&pool, rome(), &payload).await.unwrap();

    let preview = preview_cancellation(&pool, rome(), &confirmation.booking_session_id)
        .await
        .unwrap();
    assert_eq!(preview.cancellable_count, 2);
    assert_eq!(preview.first_date.as_deref(), Some(DATE));

    let outcome = confirm_cancellation(&pool, &confirmation.booking_session_id)
        .await
        .unwrap();
    assert_eq!(outcome.cancelled_count, 2);

    // The cancelled slots are immediately bookable again
    let payload = booking("10:00", vec![request(taglio)], vec![anna]);
    assert!(commit_booking(&pool, rome(), &payload).await.is_ok());
}
