//! 出站通知 - WhatsApp 网关与日志通知器
//!
//! # 模块结构
//!
//! - [`Notifier`] - 通知投递抽象
//! - [`WhatsAppGateway`] - reqwest 实现，按租户解析凭证
//! - [`LogNotifier`] - 只写日志，开发与测试默认
//! - [`ReminderScheduler`] - 后台提醒调度循环
//!
//! 调用方一律 fire-and-forget：投递失败只记日志，绝不影响业务结果。

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::core::Config;

pub mod reminders;

pub use reminders::ReminderScheduler;

/// 投递渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyChannel {
    Email,
    WhatsApp,
}

/// 待投递的一条消息
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// 租户标识，用于解析租户级凭证
    pub tenant: String,
    pub channel: NotifyChannel,
    /// 电话号码 (WhatsApp) 或邮箱地址 (Email)
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Gateway credentials missing for tenant '{0}'")]
    NotConfigured(String),
    #[error("Channel not supported by this notifier")]
    UnsupportedChannel,
    #[error("Invalid recipient '{0}'")]
    InvalidRecipient(String),
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Gateway rejected message: {0}")]
    Rejected(String),
}

/// 通知投递抽象
///
/// 实现方只负责投递；重试、排队、频控都在调度层。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError>;
}

/// 只写日志的通知器 (开发环境与测试默认)
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        tracing::info!(
            tenant = %message.tenant,
            channel = ?message.channel,
            recipient = %message.recipient,
            body_len = message.body.len(),
            "Notification (log only)"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct GatewayPayload<'a> {
    client_id: &'a str,
    api_key: &'a str,
    phone: &'a str,
    country_code: &'a str,
    message: &'a str,
}

/// WhatsApp 网关通知器
///
/// 凭证解析顺序：环境变量 `WA_CLIENT_ID_<TENANT>` / `WA_API_KEY_<TENANT>`
/// (租户 slug 大写、`-` 换 `_`)，缺失时退回全局 `WA_CLIENT_ID` / `WA_API_KEY`。
pub struct WhatsAppGateway {
    client: reqwest::Client,
    gateway_url: String,
    default_client_id: Option<String>,
    default_api_key: Option<String>,
}

impl WhatsAppGateway {
    pub fn new(
        gateway_url: impl Into<String>,
        default_client_id: Option<String>,
        default_api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url: gateway_url.into(),
            default_client_id,
            default_api_key,
        }
    }

    /// 根据配置构建；未配置网关地址时返回 None (调用方退回 LogNotifier)
    pub fn from_config(config: &Config) -> Option<Self> {
        config.wa_gateway_url.as_ref().map(|url| {
            Self::new(
                url.clone(),
                config.wa_client_id.clone(),
                config.wa_api_key.clone(),
            )
        })
    }

    fn credentials_for(&self, tenant: &str) -> Option<(String, String)> {
        let suffix = tenant_env_suffix(tenant);
        let client_id = std::env::var(format!("WA_CLIENT_ID_{suffix}"))
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.default_client_id.clone())?;
        let api_key = std::env::var(format!("WA_API_KEY_{suffix}"))
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.default_api_key.clone())?;
        Some((client_id, api_key))
    }
}

#[async_trait]
impl Notifier for WhatsAppGateway {
    async fn deliver(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        if message.channel != NotifyChannel::WhatsApp {
            return Err(NotifyError::UnsupportedChannel);
        }
        let (client_id, api_key) = self
            .credentials_for(&message.tenant)
            .ok_or_else(|| NotifyError::NotConfigured(message.tenant.clone()))?;
        let (phone, country_code) = normalize_msisdn(&message.recipient)
            .ok_or_else(|| NotifyError::InvalidRecipient(message.recipient.clone()))?;

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&GatewayPayload {
                client_id: &client_id,
                api_key: &api_key,
                phone: &phone,
                country_code: &country_code,
                message: &message.body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!("{status}: {body}")));
        }
        // Gateways answer 200 with {"status": 0} on logical failure
        if let Ok(value) = response.json::<serde_json::Value>().await {
            if let Some(code) = value.get("status").and_then(|s| s.as_i64()) {
                if code != 1 {
                    return Err(NotifyError::Rejected(value.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// 租户 slug 转环境变量后缀: "demo-salon" -> "DEMO_SALON"
fn tenant_env_suffix(tenant: &str) -> String {
    tenant
        .chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

/// 电话号码规整为 (纯数字, 国家码)
///
/// 剥掉非数字和国际前缀 00；不带国家码的本地号码 (≤10 位) 默认补 39。
/// 空结果返回 None。
pub fn normalize_msisdn(raw: &str) -> Option<(String, String)> {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with("00") {
        digits = digits.trim_start_matches('0').to_string();
    }
    if digits.is_empty() {
        return None;
    }
    if !digits.starts_with("39") && digits.len() <= 10 {
        digits = format!("39{digits}");
    }
    let country_code = if digits.starts_with("39") {
        "39".to_string()
    } else {
        digits.chars().take(2).collect()
    };
    Some((digits, country_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_msisdn() {
        assert_eq!(
            normalize_msisdn("+39 333 123 4567"),
            Some(("393331234567".into(), "39".into()))
        );
        // Local number without country code gets 39 prepended
        assert_eq!(
            normalize_msisdn("333 123 4567"),
            Some(("393331234567".into(), "39".into()))
        );
        // 00 international prefix stripped
        assert_eq!(
            normalize_msisdn("0041 79 123 45 67"),
            Some(("41791234567".into(), "41".into()))
        );
        assert_eq!(normalize_msisdn(""), None);
        assert_eq!(normalize_msisdn("n/a"), None);
    }

    #[test]
    fn test_tenant_env_suffix() {
        assert_eq!(tenant_env_suffix("demo-salon"), "DEMO_SALON");
        assert_eq!(tenant_env_suffix("t1"), "T1");
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let message = OutboundMessage {
            tenant: "demo".into(),
            channel: NotifyChannel::WhatsApp,
            recipient: "+39 333 1234567".into(),
            subject: None,
            body: "hello".into(),
        };
        assert!(LogNotifier.deliver(&message).await.is_ok());
    }

    #[tokio::test]
    async fn test_gateway_rejects_email_channel() {
        let gateway = WhatsAppGateway::new("http://localhost:1", None, None);
        let message = OutboundMessage {
            tenant: "demo".into(),
            channel: NotifyChannel::Email,
            recipient: "a@b.c".into(),
            subject: None,
            body: "hello".into(),
        };
        assert!(matches!(
            gateway.deliver(&message).await,
            Err(NotifyError::UnsupportedChannel)
        ));
    }
}
