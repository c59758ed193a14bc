use super::*;
use shared::models::{
    AppointmentKind, BusinessInfo, GuardRailMode, Operator, OperatorKind, OperatorShift, Service,
};

fn business() -> BusinessInfo {
    BusinessInfo {
        id: 1,
        name: "Studio Test".to_string(),
        phone: None,
        email: None,
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

fn business_closed_on(days: &[&str]) -> BusinessInfo {
    let mut info = business();
    info.closing_days = days.iter().map(|d| d.to_string()).collect();
    info
}

fn operator(id: i64, name: &str) -> Operator {
    Operator {
        id,
        name: name.to_string(),
        kind: OperatorKind::Person,
        phone: None,
        is_visible: true,
        is_deleted: false,
        notify_shifts: false,
        created_at: 0,
        updated_at: 0,
    }
}

fn service(id: i64, duration_min: i64, operator_ids: &[i64]) -> Service {
    Service {
        id,
        name: format!("Service {id}"),
        description: None,
        duration_min,
        price_cents: 2000,
        max_concurrent: 1,
        is_visible_online: true,
        is_deleted: false,
        created_at: 0,
        updated_at: 0,
        operator_ids: operator_ids.to_vec(),
    }
}

fn shift(operator_id: i64, start: &str, end: &str) -> OperatorShift {
    OperatorShift {
        id: 0,
        operator_id,
        shift_date: "2025-06-02".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        created_at: 0,
    }
}

fn busy(operator_id: i64, start: i64, end: i64) -> Occupancy {
    Occupancy {
        operator_id: Some(operator_id),
        kind: AppointmentKind::Booked,
        interval: Interval::new(start, end),
    }
}

fn block(operator_id: Option<i64>, start: i64, end: i64) -> Occupancy {
    Occupancy {
        operator_id,
        kind: AppointmentKind::Block,
        interval: Interval::new(start, end),
    }
}

fn item(service_id: i64, duration_min: i64) -> ChainItem {
    ChainItem {
        service_id,
        duration_min,
        preferred_operator_id: None,
    }
}

fn item_with(service_id: i64, duration_min: i64, preferred: i64) -> ChainItem {
    ChainItem {
        service_id,
        duration_min,
        preferred_operator_id: Some(preferred),
    }
}

fn index_for(
    business: &BusinessInfo,
    operators: &[Operator],
    shifts: &[OperatorShift],
    occupancy: &[Occupancy],
) -> AvailabilityIndex {
    AvailabilityIndex::build("Monday", business, operators, shifts, occupancy)
}

/// Minutes helper: "09:30" style literals read better as h * 60 + m.
fn m(hours: i64, minutes: i64) -> i64 {
    hours * 60 + minutes
}

mod test_resolver;
