use chrono_tz::Tz;

/// 服务器配置 - 预约后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | /var/lib/booking | 租户数据库目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | Europe/Rome | 业务时区 (IANA) |
/// | WA_GATEWAY_URL | (空) | WhatsApp 网关地址，空则只记日志 |
/// | WA_CLIENT_ID / WA_API_KEY | (空) | 网关全局凭证 (可被 WA_CLIENT_ID_<TENANT> 覆盖) |
/// | REMINDERS_ENABLED | true | 是否启动提醒调度循环 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/data/booking HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 租户数据库目录，每个租户一个 `<slug>.db` 文件
    pub data_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区，所有日期/时刻换算使用该时区
    pub timezone: Tz,
    /// WhatsApp 网关地址，未配置时通知只写日志
    pub wa_gateway_url: Option<String>,
    /// 网关全局凭证 (租户可用 WA_CLIENT_ID_<TENANT> 覆盖)
    pub wa_client_id: Option<String>,
    pub wa_api_key: Option<String>,
    /// 是否启动后台提醒调度循环
    pub reminders_enabled: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|name| match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!("Invalid TIMEZONE '{}', falling back to Europe/Rome", name);
                    None
                }
            })
            .unwrap_or(chrono_tz::Europe::Rome);

        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/booking".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone,
            wa_gateway_url: std::env::var("WA_GATEWAY_URL").ok().filter(|s| !s.is_empty()),
            wa_client_id: std::env::var("WA_CLIENT_ID").ok().filter(|s| !s.is_empty()),
            wa_api_key: std::env::var("WA_API_KEY").ok().filter(|s| !s.is_empty()),
            reminders_enabled: std::env::var("REMINDERS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config.reminders_enabled = false;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
