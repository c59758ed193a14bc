//! Slot listing.
//!
//! Builds the day's availability snapshot, runs the scan and formats
//! the result for the web client.

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db::repository::{appointment, business_info, operator, shift};
use crate::scheduling::{
    AvailabilityIndex, CapabilityMap, DayPosition, Interval, Occupancy, RandomChoice, scan_slots,
};
use crate::utils::time::{
    current_minute_of_day, day_end_millis, day_start_millis, millis_to_minute, parse_date,
    today_local, weekday_name,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{ServiceRequestItem, SlotEntry, SlotListing};
use shared::util::format_hhmm;

/// Valid chain start times for one date.
///
/// `fixed_operator_id` narrows the scan to a single operator. It is
/// ignored when any item carries its own preference, which constrains
/// the assignment more precisely already.
pub async fn list_available_slots(
    pool: &SqlitePool,
    tz: Tz,
    date_str: &str,
    items: &[ServiceRequestItem],
    fixed_operator_id: Option<i64>,
) -> AppResult<SlotListing> {
    if items.is_empty() {
        return Err(AppError::validation("At least one service must be requested"));
    }
    let date = parse_date(date_str)?;

    let business = business_info::get(pool)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BusinessInfoMissing))?;
    let services = super::load_requested_services(pool, items).await?;

    let today = today_local(tz);
    let position = if date < today {
        DayPosition::Past
    } else if date == today {
        DayPosition::Today {
            minute: current_minute_of_day(tz),
        }
    } else {
        DayPosition::Future
    };
    if position == DayPosition::Past {
        return Ok(SlotListing {
            date: date_str.to_string(),
            slots: Vec::new(),
            diagnostics: vec!["Requested date is in the past".to_string()],
        });
    }

    let mut operators = operator::find_schedulable(pool).await?;
    let has_preferences = items.iter().any(|i| i.preferred_operator_id.is_some());
    if let Some(fixed) = fixed_operator_id {
        if !has_preferences {
            let op = super::require_schedulable(pool, &operators, fixed).await?.clone();
            operators = vec![op];
        }
    }

    let shifts = shift::find_by_date(pool, date_str).await?;
    let from_ms = day_start_millis(date, tz);
    let to_ms = day_end_millis(date, tz);
    let occupancy: Vec<Occupancy> = appointment::find_occupying_in_range(pool, from_ms, to_ms)
        .await?
        .into_iter()
        .map(|row| {
            let start = millis_to_minute(row.start_time, tz);
            Occupancy {
                operator_id: row.operator_id,
                kind: row.kind,
                interval: Interval::new(start, start + row.duration_min),
            }
        })
        .collect();

    let index = AvailabilityIndex::build(
        weekday_name(date),
        &business,
        &operators,
        &shifts,
        &occupancy,
    );

    if index.is_closed_day() {
        return Ok(SlotListing {
            date: date_str.to_string(),
            slots: Vec::new(),
            diagnostics: vec![format!("Closed on {}", weekday_name(date))],
        });
    }
    if !index.has_working_time() {
        return Ok(SlotListing {
            date: date_str.to_string(),
            slots: Vec::new(),
            diagnostics: vec!["No operator works on this date".to_string()],
        });
    }

    let capabilities = CapabilityMap::from_services(&services);
    let chain = super::chain_items(items, &services);
    let found = scan_slots(
        &chain,
        &operators,
        &index,
        &capabilities,
        position,
        &mut RandomChoice,
    );

    let slots: Vec<SlotEntry> = found
        .into_iter()
        .map(|(minute, operator_ids)| SlotEntry {
            time: format_hhmm(minute),
            operator_ids,
        })
        .collect();

    let diagnostics = if slots.is_empty() {
        vec!["No start time can fit the requested services".to_string()]
    } else {
        Vec::new()
    };

    Ok(SlotListing {
        date: date_str.to_string(),
        slots,
        diagnostics,
    })
}
