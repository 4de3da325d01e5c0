//! SkillHub - 双语技能目录
//!
//! 模块划分：
//! - **catalog**: 实体模型、内置数据集、数据源解析（实时 / 内置二选一）、过滤引擎、展示投影
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **error**: 目录错误类型
//! - **i18n**: 界面文案（en / zh）
//! - **observability**: 日志初始化
//! - **store**: 存储抽象（SQLite / 内存 / 远程只读）与管理员导入
//! - **web**: HTTP 接口（feature `web`）

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod observability;
pub mod store;
#[cfg(feature = "web")]
pub mod web;

pub use catalog::{CatalogResolver, CatalogView, CategorySelection, Language, ResolvedCatalog};
pub use error::{CatalogError, Result};
