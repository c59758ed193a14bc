use std::sync::Arc;

use crate::core::Config;
use crate::db::TenantRegistry;
use crate::notify::{LogNotifier, Notifier, WhatsAppGateway};

/// 服务器状态 - 持有所有共享资源的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。axum 的每个 handler
/// 通过 `State<ServerState>` 拿到一份克隆。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | tenants | Arc<TenantRegistry> | 租户数据库池注册表 |
/// | notifier | Arc<dyn Notifier> | 出站通知投递 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Arc<Config>,
    /// 租户数据库池注册表 (懒打开, DashMap 缓存)
    pub tenants: Arc<TenantRegistry>,
    /// 出站通知投递 (WhatsApp 网关或日志)
    pub notifier: Arc<dyn Notifier>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试用)
    pub fn new(config: Config, tenants: TenantRegistry, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            tenants: Arc::new(tenants),
            notifier,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 确保数据目录存在
    /// 2. 构建租户注册表
    /// 3. 按配置选择通知器：网关地址已配置则走 WhatsApp 网关，否则只记日志
    pub fn initialize(config: Config) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let tenants = TenantRegistry::new(&config.data_dir);

        let notifier: Arc<dyn Notifier> = match WhatsAppGateway::from_config(&config) {
            Some(gateway) => {
                tracing::info!("Notifications via WhatsApp gateway");
                Arc::new(gateway)
            }
            None => {
                tracing::info!("No notification gateway configured, logging only");
                Arc::new(LogNotifier)
            }
        };

        Ok(Self::new(config, tenants, notifier))
    }
}
