//! 时间工具函数 — 业务时区转换
//!
//! 调度引擎内部使用"当天第几分钟" (minutes since midnight)，
//! 存储层只接收 `i64` Unix millis。两种坐标的转换统一在这里完成。

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 一天的分钟数
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析 HH:MM → 当天第几分钟
pub fn parse_hhmm(time: &str) -> AppResult<i64> {
    let invalid = || AppError::validation(format!("Invalid time format: {}", time));
    let (h, m) = time.split_once(':').ok_or_else(invalid)?;
    let h: i64 = h.parse().map_err(|_| invalid())?;
    let m: i64 = m.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return Err(invalid());
    }
    Ok(h * 60 + m)
}

/// 解析配置里的 HH:MM，失败时警告并使用默认值
///
/// BusinessInfo 的时间字段由后台维护，不因为一条脏数据拒绝整个请求。
pub fn parse_hhmm_or(time: &str, default_min: i64) -> i64 {
    match parse_hhmm(time) {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(
                "Failed to parse time-of-day '{}', falling back to {}",
                time,
                shared::util::format_hhmm(default_min)
            );
            default_min
        }
    }
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// 超出范围的时分秒按 00:00:00 处理。
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let time = NaiveTime::from_hms_opt(hour, min, sec).unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期 + 当天第几分钟 → Unix millis (业务时区)
pub fn minute_to_millis(date: NaiveDate, minute_of_day: i64, tz: Tz) -> i64 {
    let clamped = minute_of_day.clamp(0, MINUTES_PER_DAY - 1);
    date_hms_to_millis(date, (clamped / 60) as u32, (clamped % 60) as u32, 0, tz)
}

/// Unix millis → 业务时区当天第几分钟
pub fn millis_to_minute(millis: i64, tz: Tz) -> i64 {
    let dt = Utc
        .timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
        .with_timezone(&tz);
    (dt.hour() as i64) * 60 + dt.minute() as i64
}

/// Unix millis → 业务时区日期
pub fn millis_to_local_date(millis: i64, tz: Tz) -> NaiveDate {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
        .with_timezone(&tz)
        .date_naive()
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// 业务时区的今天
pub fn today_local(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 业务时区当前时刻是当天第几分钟
pub fn current_minute_of_day(tz: Tz) -> i64 {
    let now = Utc::now().with_timezone(&tz);
    (now.hour() as i64) * 60 + now.minute() as i64
}

/// 英文星期名 ("Monday" ... "Sunday")，用于 closing_days 匹配
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rome() -> Tz {
        "Europe/Rome".parse().unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-02").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
        assert!(parse_date("02/06/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("09:30").unwrap(), 570);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("9").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }

    #[test]
    fn test_parse_hhmm_or_falls_back() {
        assert_eq!(parse_hhmm_or("08:00", 0), 480);
        assert_eq!(parse_hhmm_or("garbage", 480), 480);
    }

    #[test]
    fn test_minute_millis_roundtrip() {
        let tz = rome();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let ms = minute_to_millis(date, 570, tz);
        assert_eq!(millis_to_minute(ms, tz), 570);
        assert_eq!(millis_to_local_date(ms, tz), date);
    }

    #[test]
    fn test_day_bounds_cover_one_day() {
        let tz = rome();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
        // Appointment at 09:30 falls inside [start, end)
        let at = minute_to_millis(date, 570, tz);
        assert!(start <= at && at < end);
    }

    #[test]
    fn test_weekday_name() {
        // 2025-06-02 is a Monday
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(weekday_name(date), "Monday");
        assert_eq!(weekday_name(date.succ_opt().unwrap()), "Tuesday");
    }
}
