//! Booking Server - 多租户沙龙在线预约后端
//!
//! # 架构概述
//!
//! 本模块是预约后端的主入口，提供以下核心功能：
//!
//! - **排班引擎** (`scheduling`): 可用性索引、时段扫描、服务链操作员指派
//! - **预约服务** (`booking`): 时段列表、预约提交、会话取消
//! - **数据库** (`db`): 每租户一个 SQLite 文件，懒打开并缓存
//! - **通知** (`notify`): WhatsApp/邮件投递与每日提醒调度
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态
//! ├── api/           # HTTP 路由和处理器
//! ├── booking/       # 预约服务层
//! ├── scheduling/    # 排班引擎 (纯计算)
//! ├── notify/        # 出站通知、提醒调度
//! ├── db/            # 租户注册表、仓储
//! └── utils/         # 日志、时间工具
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod notify;
pub mod scheduling;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, ServerState};
pub use db::TenantRegistry;
pub use notify::{LogNotifier, Notifier, ReminderScheduler, WhatsAppGateway};

// Re-export unified error types from shared
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
