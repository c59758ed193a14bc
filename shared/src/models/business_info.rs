//! Business Info Model

use serde::{Deserialize, Serialize};

/// Guard-rail enforcement mode for web bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum GuardRailMode {
    None,
    Warning,
    Block,
}

impl Default for GuardRailMode {
    fn default() -> Self {
        Self::None
    }
}

/// Business information entity (singleton per tenant, row id = 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BusinessInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Advertised opening time "HH:MM" (display only)
    pub opening_time: String,
    /// Advertised closing time "HH:MM" (display only)
    pub closing_time: String,
    /// Effective scheduling window start "HH:MM"
    #[serde(default = "default_active_opening")]
    pub active_opening_time: String,
    /// Effective scheduling window end "HH:MM"
    #[serde(default = "default_active_closing")]
    pub active_closing_time: String,
    /// English weekday names the business is closed on (JSON array)
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub closing_days: Vec<String>,

    /// Cap on total chain duration for web bookings (minutes)
    pub booking_max_duration_min: Option<i64>,
    pub duration_rule: GuardRailMode,
    pub duration_rule_message: Option<String>,
    /// Cap on total chain price for web bookings (cents)
    pub booking_max_price_cents: Option<i64>,
    pub price_rule: GuardRailMode,
    pub price_rule_message: Option<String>,

    /// Morning client reminder toggle
    pub reminder_enabled: bool,
    /// "HH:MM" local time the morning reminder queue is built
    pub reminder_time: String,
    /// Template with {name} {date} {time} {services} placeholders
    pub reminder_template: Option<String>,
    /// Next-day operator agenda toggle
    pub agenda_enabled: bool,
    /// "HH:MM" local time the agenda queue is built
    pub agenda_time: String,
    pub agenda_template: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

fn default_active_opening() -> String {
    "08:00".to_string()
}

fn default_active_closing() -> String {
    "20:00".to_string()
}

impl BusinessInfo {
    /// Whether the given English weekday name ("Monday", ...) is a closure day
    pub fn is_closed_on(&self, weekday: &str) -> bool {
        self.closing_days.iter().any(|d| d == weekday)
    }
}
