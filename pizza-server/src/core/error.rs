//! 启动阶段错误
//!
//! 请求处理中的错误使用 [`crate::utils::AppError`]；这里只覆盖服务器启动与运行。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
