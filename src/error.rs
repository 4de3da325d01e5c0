//! 目录错误类型
//!
//! 存储、远程数据源、静态数据解析与管理操作共用一个错误枚举；
//! 解析器（Resolver）不会把这些错误抛给展示层，而是转为回退状态。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Remote request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote source returned {0}: {1}")]
    RemoteStatus(u16, String),

    #[error("Static dataset invalid: {0}")]
    StaticData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 导入中途失败：已写入的条目不会回滚
    #[error(
        "Seed failed after {categories_written} categories and {skills_written} skills: {source}"
    )]
    SeedFailed {
        categories_written: usize,
        skills_written: usize,
        #[source]
        source: Box<CatalogError>,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
