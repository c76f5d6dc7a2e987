/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件由 `dotenv` 预先加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite:pizza.db | SQLite 数据库位置 |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志目录，设置后按天滚动写文件 |
/// | INVOICE_TAX_RATE | 0.10 | 发票税率 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/pizza.db HTTP_PORT=3000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 连接串
    pub database_url: String,
    /// 连接池最大连接数
    pub db_max_connections: u32,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
    /// 发票税率 (0.10 = 10%)
    pub invoice_tax_rate: f64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:pizza.db".into()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(5),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            invoice_tax_rate: std::env::var("INVOICE_TAX_RATE")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|r| r.is_finite() && *r >= 0.0)
                .unwrap_or(DEFAULT_INVOICE_TAX_RATE),
        }
    }

    /// 使用指定数据库覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_database(database_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config
    }
}

/// 默认发票税率 10%
pub const DEFAULT_INVOICE_TAX_RATE: f64 = 0.10;

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
