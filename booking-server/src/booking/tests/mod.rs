use super::*;
use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db::repository::{appointment, business_info, operator, service, shift};
use crate::utils::time::{minute_to_millis, parse_date, parse_hhmm};
use shared::models::{
    AppointmentCreate, AppointmentKind, BookingCreate, BookingSource, BusinessInfo, ClientContact,
    GuardRailMode, OperatorCreate, OperatorShiftCreate, ServiceCreate, ServiceRequestItem,
    SlotListing,
};

/// A Monday far in the future, so the today cutoff never interferes.
const DATE: &str = "2030-06-03";

fn rome() -> Tz {
    "Europe/Rome".parse().unwrap()
}

fn studio() -> BusinessInfo {
    BusinessInfo {
        id: 1,
        name: "Studio Test".to_string(),
        phone: None,
        email: Some("studio@example.com".to_string()),
        opening_time: "09:00".to_string(),
        closing_time: "18:00".to_string(),
        active_opening_time: "09:00".to_string(),
        active_closing_time: "18:00".to_string(),
        closing_days: vec![],
        booking_max_duration_min: None,
        duration_rule: GuardRailMode::None,
        duration_rule_message: None,
        booking_max_price_cents: None,
        price_rule: GuardRailMode::None,
        price_rule_message: None,
        reminder_enabled: false,
        reminder_time: "08:00".to_string(),
        reminder_template: None,
        agenda_enabled: false,
        agenda_time: "20:30".to_string(),
        agenda_template: None,
        created_at: 0,
        updated_at: 0,
    }
}

async fn seed_studio(pool: &SqlitePool) {
    business_info::save(pool, &studio()).await.unwrap();
}

async fn seed_operator(pool: &SqlitePool, name: &str) -> i64 {
    operator::create(
        pool,
        OperatorCreate {
            name: name.to_string(),
            kind: None,
            phone: None,
            is_visible: None,
            notify_shifts: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_service(
    pool: &SqlitePool,
    name: &str,
    duration_min: i64,
    price_cents: i64,
    operator_ids: &[i64],
) -> i64 {
    service::create(
        pool,
        ServiceCreate {
            name: name.to_string(),
            description: None,
            duration_min,
            price_cents,
            max_concurrent: None,
            is_visible_online: None,
            operator_ids: Some(operator_ids.to_vec()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_hidden_service(
    pool: &SqlitePool,
    name: &str,
    duration_min: i64,
    price_cents: i64,
    operator_ids: &[i64],
) -> i64 {
    service::create(
        pool,
        ServiceCreate {
            name: name.to_string(),
            description: None,
            duration_min,
            price_cents,
            max_concurrent: None,
            is_visible_online: Some(false),
            operator_ids: Some(operator_ids.to_vec()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_shift(pool: &SqlitePool, operator_id: i64, start: &str, end: &str) {
    shift::create(
        pool,
        OperatorShiftCreate {
            operator_id,
            shift_date: DATE.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        },
    )
    .await
    .unwrap();
}

/// Insert an appointment row directly, bypassing the committer.
async fn seed_appointment(
    pool: &SqlitePool,
    operator_id: Option<i64>,
    date: &str,
    time: &str,
    duration_min: i64,
    kind: AppointmentKind,
    session: Option<&str>,
) {
    let day = parse_date(date).unwrap();
    let start = minute_to_millis(day, parse_hhmm(time).unwrap(), rome());
    let mut conn = pool.acquire().await.unwrap();
    appointment::insert(
        &mut conn,
        &AppointmentCreate {
            kind,
            client_id: None,
            operator_id,
            service_id: None,
            start_time: start,
            duration_min,
            note: None,
            source: BookingSource::Desk,
            booking_session_id: session.map(String::from),
        },
    )
    .await
    .unwrap();
}

fn request(service_id: i64) -> ServiceRequestItem {
    ServiceRequestItem {
        service_id,
        preferred_operator_id: None,
        is_block: false,
    }
}

fn request_with(service_id: i64, preferred: i64) -> ServiceRequestItem {
    ServiceRequestItem {
        service_id,
        preferred_operator_id: Some(preferred),
        is_block: false,
    }
}

fn block_request(service_id: i64) -> ServiceRequestItem {
    ServiceRequestItem {
        service_id,
        preferred_operator_id: None,
        is_block: true,
    }
}

fn contact() -> ClientContact {
    ClientContact {
        name: "Maria Rossi".to_string(),
        phone: Some("+39 333 1234567".to_string()),
        email: Some("maria@example.com".to_string()),
    }
}

fn booking(time: &str, services: Vec<ServiceRequestItem>, assignment: Vec<i64>) -> BookingCreate {
    BookingCreate {
        date: DATE.to_string(),
        time: time.to_string(),
        services,
        operator_assignment: assignment,
        client: contact(),
    }
}

fn times(listing: &SlotListing) -> Vec<&str> {
    listing.slots.iter().map(|s| s.time.as_str()).collect()
}

mod test_cancel;
