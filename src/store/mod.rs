//! 目录存储抽象层
//!
//! - [`CatalogSource`]：只读查询接口，解析器通过它获取实时数据
//! - [`CatalogStore`]：在只读接口之上增加写入（导入、增改、删除）
//!
//! 实现：SQLite（sqlx）、内存、远程 HTTP（只读）。

mod memory;
mod records;
mod remote;
mod seed;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, SourceKind};
use crate::error::Result;

pub use memory::MemoryCatalogStore;
pub use records::{CategoryRecord, SkillRecord};
pub use remote::RemoteCatalogSource;
pub use seed::{seed_catalog, Caller, SeedPayload, SeedReport};
pub use sqlite::SqliteCatalogStore;

/// 只读查询接口
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// 全部分类，按 sortOrder 升序
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>>;

    /// 全部启用的技能，按 sortOrder 升序
    async fn list_skills(&self) -> Result<Vec<SkillRecord>>;
}

/// 可写存储接口
#[async_trait]
pub trait CatalogStore: CatalogSource {
    /// 某分类下启用的技能
    async fn skills_by_category(&self, category_id: &str) -> Result<Vec<SkillRecord>>;

    /// 按 id 查询技能（含未启用的）
    async fn skill_by_id(&self, id: &str) -> Result<Option<SkillRecord>>;

    /// 按 id 插入或覆盖分类
    async fn upsert_category(&self, category: &CategoryRecord) -> Result<()>;

    /// 按 id 插入或覆盖技能
    async fn upsert_skill(&self, skill: &SkillRecord) -> Result<()>;

    /// 删除技能，返回是否存在
    async fn delete_skill(&self, id: &str) -> Result<bool>;
}

/// 创建可写存储
///
/// 优先打开配置的 SQLite 文件；失败时记录警告并退回内存存储
pub async fn create_catalog_store(config: &AppConfig) -> Arc<dyn CatalogStore> {
    let path = config.database.path.clone();
    match SqliteCatalogStore::open(&path, config.database.max_connections).await {
        Ok(store) => {
            tracing::info!("Using SQLite catalog store: {:?}", path);
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Failed to open SQLite store {:?}, falling back to memory: {}", path, e);
            Arc::new(MemoryCatalogStore::new())
        }
    }
}

/// 按 `[catalog].source` 创建解析器使用的实时数据源；`static` 时返回 None
pub async fn create_catalog_source(config: &AppConfig) -> Option<Arc<dyn CatalogSource>> {
    match config.catalog.source {
        SourceKind::Static => {
            tracing::info!("Live catalog source disabled, using static dataset only");
            None
        }
        SourceKind::Remote => match RemoteCatalogSource::from_config(&config.remote) {
            Ok(source) => {
                tracing::info!("Using remote catalog source: {}", config.remote.base_url);
                Some(Arc::new(source))
            }
            Err(e) => {
                tracing::warn!("Failed to build remote catalog source: {}", e);
                None
            }
        },
        SourceKind::Sqlite => {
            let path = &config.database.path;
            match SqliteCatalogStore::open(path, config.database.max_connections).await {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::warn!("Failed to open SQLite source {:?}: {}", path, e);
                    None
                }
            }
        }
    }
}

/// 把可写存储当作只读数据源交给解析器（同一连接池，不重复打开）
pub fn store_as_source(store: Arc<dyn CatalogStore>) -> Arc<dyn CatalogSource> {
    Arc::new(StoreSource(store))
}

struct StoreSource(Arc<dyn CatalogStore>);

#[async_trait]
impl CatalogSource for StoreSource {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.0.list_categories().await
    }

    async fn list_skills(&self) -> Result<Vec<SkillRecord>> {
        self.0.list_skills().await
    }
}
