//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SKILLHUB__*` 覆盖
//! （双下划线表示嵌套，如 `SKILLHUB__DATABASE__PATH=/tmp/a.db`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::model::Language;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub catalog: CatalogSection,
    pub database: DatabaseSection,
    pub remote: RemoteSection,
    pub server: ServerSection,
    pub admin: AdminSection,
}

/// [app] 段：应用名、默认界面语言
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
    #[serde(default)]
    pub default_language: Language,
}

/// 实时数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Sqlite,
    Remote,
    /// 不连接实时数据，始终使用内置数据集
    Static,
}

/// [catalog] 段：数据来源与拉取重试次数
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    #[serde(default)]
    pub source: SourceKind,
    /// 每次拉取失败后的自动重试次数
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,
}

fn default_fetch_retries() -> u32 {
    1
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            fetch_retries: default_fetch_retries(),
        }
    }
}

/// [database] 段：SQLite 文件与连接池大小
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/skillhub.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// [remote] 段：远程 skillhub-web 地址与请求超时（秒）
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSection {
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_remote_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_remote_timeout_secs() -> u64 {
    15
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            base_url: default_remote_base_url(),
            timeout_secs: default_remote_timeout_secs(),
        }
    }
}

/// [server] 段：Web 监听地址
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// [admin] 段：管理令牌；未设置时拒绝所有写操作
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminSection {
    pub token: Option<String>,
}

/// 从 config 目录加载配置，环境变量 SKILLHUB__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SKILLHUB__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        } else {
            tracing::warn!("Config file {:?} not found, ignoring", path);
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SKILLHUB")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.catalog.source, SourceKind::Sqlite);
        assert_eq!(cfg.catalog.fetch_retries, 1);
        assert_eq!(cfg.database.path, PathBuf::from("data/skillhub.db"));
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.app.default_language, Language::En);
        assert!(cfg.admin.token.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[app]
default_language = "zh"

[catalog]
source = "static"
fetch_retries = 3

[database]
path = "/tmp/other.db"

[admin]
token = "secret"
"#,
        )
        .unwrap();

        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg.app.default_language, Language::Zh);
        assert_eq!(cfg.catalog.source, SourceKind::Static);
        assert_eq!(cfg.catalog.fetch_retries, 3);
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(cfg.admin.token.as_deref(), Some("secret"));
        // 未写的段保持默认
        assert_eq!(cfg.remote.timeout_secs, 15);
    }
}
