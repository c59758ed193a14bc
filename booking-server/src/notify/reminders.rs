//! 提醒调度器 - 早间客户提醒与次日操作员日程
//!
//! 一个 supervisor 循环每分钟 tick 一次；每个租户的待发队列是一个
//! 独立的 mpsc 通道 + 自有 drain 任务，supervisor 只负责在配置的
//! 时间点构建消息并投入通道，不共享任何可变状态。
//!
//! # 节奏
//!
//! - 到达 `BusinessInfo.reminder_time` 时构建当天客户提醒队列：
//!   今天尚未开始的 BOOKED 预约，按客户分组，同一客户的连续服务
//!   合并成一条消息；排除占位客户和无手机号客户
//! - 到达 `BusinessInfo.agenda_time` 时构建次日操作员日程队列：
//!   已开启通知的真人操作员，明天至少有一条安排才会收到
//! - drain 任务每分钟至多投递一条，摊平网关压力
//! - 日期变更时旧队列整体作废

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::db::repository::{appointment, business_info, operator};
use crate::notify::{Notifier, NotifyChannel, OutboundMessage};
use crate::utils::AppResult;
use crate::utils::time::{
    current_minute_of_day, day_end_millis, day_start_millis, millis_to_minute, parse_hhmm_or,
    today_local,
};
use shared::models::{AppointmentKind, BusinessInfo};
use shared::util::format_hhmm;

/// supervisor tick 间隔
const TICK: std::time::Duration = std::time::Duration::from_secs(60);

/// 同一租户两条消息之间的最小间隔
const DRAIN_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// 错过精确触发分钟后仍允许构建队列的窗口 (tick 漂移、进程重启)
const BUILD_WINDOW_MIN: i64 = 5;

const DEFAULT_REMINDER_TEMPLATE: &str = "Hi {name}, a quick reminder of your appointment on {date} at {time}:\n{services}\nSee you soon!";

const DEFAULT_AGENDA_TEMPLATE: &str =
    "Hi {name}, your schedule for {date}:\n{services}\nFirst appointment at {time}.";

/// 单个租户的队列句柄 (仅 supervisor 访问)
///
/// 队列本体是 mpsc 通道，consumer 是 [`drain_queue`] 任务。
/// 日期变更或提醒被关闭时取消旧任务、丢弃积压消息。
struct TenantWorker {
    date: NaiveDate,
    morning_built: bool,
    agenda_built: bool,
    queue: mpsc::UnboundedSender<OutboundMessage>,
    cancel: CancellationToken,
}

/// 后台提醒调度器
///
/// 在 `main` 中作为独立任务启动，`REMINDERS_ENABLED=false` 时不启动。
pub struct ReminderScheduler {
    state: ServerState,
    shutdown: CancellationToken,
    workers: DashMap<String, TenantWorker>,
}

impl ReminderScheduler {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        Self {
            state,
            shutdown,
            workers: DashMap::new(),
        }
    }

    /// 主循环：分钟 tick + 关机信号
    ///
    /// drain 任务持有 shutdown 的 child token，关机时一并退出。
    pub async fn run(self) {
        tracing::info!("Reminder scheduler started");
        loop {
            tokio::select! {
                _ = tokio::time::sleep(TICK) => {
                    self.tick().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Reminder scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 单次 tick：逐租户推进，单租户失败不影响其余租户
    async fn tick(&self) {
        for slug in self.state.tenants.known_tenants() {
            if let Err(err) = self.tick_tenant(&slug).await {
                tracing::error!(tenant = %slug, error = %err, "Reminder tick failed");
            }
        }
    }

    async fn tick_tenant(&self, slug: &str) -> AppResult<()> {
        let pool = self.state.tenants.pool(slug).await?;
        let Some(info) = business_info::get(&pool).await? else {
            self.remove_worker(slug);
            return Ok(());
        };
        if !info.reminder_enabled && !info.agenda_enabled {
            self.remove_worker(slug);
            return Ok(());
        }

        let tz = self.state.config.timezone;
        let today = today_local(tz);
        let now_minute = current_minute_of_day(tz);

        // 先在同步段判定本 tick 要构建哪些队列，再做异步 DB 工作，
        // 避免跨 await 持有 DashMap 守卫。
        let (morning_due, agenda_due) = {
            let mut worker = self
                .workers
                .entry(slug.to_string())
                .or_insert_with(|| self.spawn_worker(slug, today));
            if worker.date != today {
                worker.cancel.cancel();
                *worker = self.spawn_worker(slug, today);
            }
            let morning_due = info.reminder_enabled
                && !worker.morning_built
                && in_build_window(now_minute, parse_hhmm_or(&info.reminder_time, 8 * 60));
            let agenda_due = info.agenda_enabled
                && !worker.agenda_built
                && in_build_window(now_minute, parse_hhmm_or(&info.agenda_time, 20 * 60 + 30));
            (morning_due, agenda_due)
        };

        if morning_due {
            let messages = build_morning_messages(
                &pool,
                &info,
                tz,
                today,
                shared::util::now_millis(),
                slug,
            )
            .await?;
            tracing::info!(tenant = %slug, count = messages.len(), "Morning reminder queue built");
            self.enqueue(slug, messages, |worker| worker.morning_built = true);
        }

        if agenda_due {
            let tomorrow = today.succ_opt().unwrap_or(today);
            let messages = build_agenda_messages(&pool, &info, tz, tomorrow, slug).await?;
            tracing::info!(tenant = %slug, count = messages.len(), "Operator agenda queue built");
            self.enqueue(slug, messages, |worker| worker.agenda_built = true);
        }

        Ok(())
    }

    /// 创建租户队列：通道 + drain 任务
    fn spawn_worker(&self, slug: &str, date: NaiveDate) -> TenantWorker {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = self.shutdown.child_token();
        tokio::spawn(drain_queue(
            slug.to_string(),
            self.state.notifier.clone(),
            rx,
            cancel.clone(),
        ));
        TenantWorker {
            date,
            morning_built: false,
            agenda_built: false,
            queue: tx,
            cancel,
        }
    }

    fn remove_worker(&self, slug: &str) {
        if let Some((_, worker)) = self.workers.remove(slug) {
            worker.cancel.cancel();
        }
    }

    fn enqueue(
        &self,
        slug: &str,
        messages: Vec<OutboundMessage>,
        mark_built: impl FnOnce(&mut TenantWorker),
    ) {
        let Some(mut worker) = self.workers.get_mut(slug) else {
            return;
        };
        mark_built(&mut worker);
        for message in messages {
            if worker.queue.send(message).is_err() {
                tracing::warn!(tenant = %slug, "Reminder queue closed, dropping message");
                return;
            }
        }
    }
}

/// 租户队列的 drain 任务：每分钟至多投递一条
async fn drain_queue(
    slug: String,
    notifier: Arc<dyn Notifier>,
    mut rx: mpsc::UnboundedReceiver<OutboundMessage>,
    cancel: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            received = rx.recv() => match received {
                Some(message) => message,
                None => return,
            },
            _ = cancel.cancelled() => return,
        };
        if let Err(err) = notifier.deliver(&message).await {
            tracing::warn!(
                tenant = %slug,
                recipient = %message.recipient,
                error = %err,
                "Reminder delivery failed"
            );
        }
        tokio::select! {
            _ = tokio::time::sleep(DRAIN_INTERVAL) => {}
            _ = cancel.cancelled() => return,
        }
    }
}

/// 触发分钟判定：`[due, due + BUILD_WINDOW_MIN)`
fn in_build_window(now_minute: i64, due_minute: i64) -> bool {
    now_minute >= due_minute && now_minute < due_minute + BUILD_WINDOW_MIN
}

/// 构建当天客户提醒消息
///
/// 只看还没开始的 BOOKED 预约。同一客户上一段结束时间 >= 下一段开始
/// 时间视为连续，合并进同一条消息，服务名列成清单。
async fn build_morning_messages(
    pool: &SqlitePool,
    info: &BusinessInfo,
    tz: Tz,
    today: NaiveDate,
    now_ms: i64,
    tenant: &str,
) -> AppResult<Vec<OutboundMessage>> {
    let rows = appointment::find_notify_rows(
        pool,
        day_start_millis(today, tz),
        day_end_millis(today, tz),
    )
    .await?;

    struct Group {
        name: String,
        phone: String,
        start_minute: i64,
        end_minute: i64,
        services: Vec<String>,
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut latest_group: HashMap<i64, usize> = HashMap::new();

    // 行按 start_time 升序，流式归并连续段
    for row in rows {
        if row.start_time <= now_ms || row.client_is_placeholder {
            continue;
        }
        let Some(client_id) = row.client_id else {
            continue;
        };
        let Some(phone) = row.client_phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            continue;
        };
        let start_minute = millis_to_minute(row.start_time, tz);
        let end_minute = start_minute + row.duration_min;

        if let Some(&idx) = latest_group.get(&client_id) {
            let group = &mut groups[idx];
            if start_minute <= group.end_minute {
                group.services.push(row.service_name);
                group.end_minute = group.end_minute.max(end_minute);
                continue;
            }
        }
        latest_group.insert(client_id, groups.len());
        groups.push(Group {
            name: title_case(&row.client_name),
            phone: phone.to_string(),
            start_minute,
            end_minute,
            services: vec![row.service_name],
        });
    }

    let template = info
        .reminder_template
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_REMINDER_TEMPLATE);
    let date_str = today.format("%d/%m/%Y").to_string();

    Ok(groups
        .into_iter()
        .map(|group| {
            let services = group
                .services
                .iter()
                .map(|name| format!("\u{2022} {name}"))
                .collect::<Vec<_>>()
                .join("\n");
            OutboundMessage {
                tenant: tenant.to_string(),
                channel: NotifyChannel::WhatsApp,
                recipient: group.phone,
                subject: None,
                body: render_template(
                    template,
                    &group.name,
                    &date_str,
                    &format_hhmm(group.start_minute),
                    &services,
                ),
            }
        })
        .collect())
}

/// 构建次日操作员日程消息
///
/// 收件人来自 [`operator::find_agenda_recipients`]；明天没有任何
/// 安排的操作员不收消息。个人 block 与占位也列进日程，全局 block
/// 不属于任何人的日程。
async fn build_agenda_messages(
    pool: &SqlitePool,
    info: &BusinessInfo,
    tz: Tz,
    tomorrow: NaiveDate,
    tenant: &str,
) -> AppResult<Vec<OutboundMessage>> {
    let recipients = operator::find_agenda_recipients(pool).await?;
    if recipients.is_empty() {
        return Ok(Vec::new());
    }
    let rows = appointment::find_agenda_rows(
        pool,
        day_start_millis(tomorrow, tz),
        day_end_millis(tomorrow, tz),
    )
    .await?;

    let template = info
        .agenda_template
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_AGENDA_TEMPLATE);
    let date_str = tomorrow.format("%d/%m/%Y").to_string();

    let mut messages = Vec::new();
    for recipient in recipients {
        let Some(phone) = recipient.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            continue;
        };
        let mine: Vec<_> = rows
            .iter()
            .filter(|row| row.operator_id == recipient.id)
            .collect();
        if mine.is_empty() {
            continue;
        }

        let mut lines = Vec::with_capacity(mine.len());
        let mut first_booked: Option<i64> = None;
        for row in &mine {
            let minute = millis_to_minute(row.start_time, tz);
            match row.kind {
                AppointmentKind::Booked => {
                    first_booked.get_or_insert(minute);
                    let label = row.service_name.as_deref().unwrap_or("Booking");
                    lines.push(format!("- {} {}", format_hhmm(minute), label));
                }
                AppointmentKind::Block | AppointmentKind::Placeholder => {
                    let label = row
                        .note
                        .as_deref()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or("Blocked");
                    lines.push(format!(
                        "- {} {} ({} min)",
                        format_hhmm(minute),
                        label,
                        row.duration_min
                    ));
                }
            }
        }

        let first_time = first_booked.map(format_hhmm).unwrap_or_else(|| "-".into());
        messages.push(OutboundMessage {
            tenant: tenant.to_string(),
            channel: NotifyChannel::WhatsApp,
            recipient: phone.to_string(),
            subject: None,
            body: render_template(
                template,
                &recipient.name,
                &date_str,
                &first_time,
                &lines.join("\n"),
            ),
        });
    }
    Ok(messages)
}

fn render_template(template: &str, name: &str, date: &str, time: &str, services: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{date}", date)
        .replace("{time}", time)
        .replace("{services}", services)
}

/// "maria ROSSI" -> "Maria Rossi"
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
