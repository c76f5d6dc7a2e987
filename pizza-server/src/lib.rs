//! Pizza Server - 披萨点餐 REST API
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite 连接池、迁移和各表的 repository
//! - **订单** (`orders`): 下单校验、金额计算、事务写入
//! - **账单** (`billing`): 发票开具和支付状态
//! - **HTTP API** (`api`): RESTful 接口，统一 `{success, message, data}` 信封
//!
//! # 模块结构
//!
//! ```text
//! pizza-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由汇总和中间件栈
//! ├── middleware/    # 请求日志
//! ├── db/            # 数据库层
//! ├── orders/        # 下单流程
//! ├── billing/       # 发票流程
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod billing;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use routes::{build_app, build_router};
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 打印启动横幅
pub fn print_banner() {
    println!(
        r#"
    ____  _
   / __ \(_)_______  ____ _
  / /_/ / /_  /_  / / __ `/
 / ____/ / / /_/ /_/ /_/ /
/_/   /_/ /___/___/\__,_/
    "#
    );
}

/// 设置运行环境：加载 .env 并初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
