//! SQLite 目录存储（sqlx 异步连接池）
//!
//! 表结构在打开时自动创建；标签列以 JSON 文本保存。

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::records::{CategoryRecord, SkillRecord};
use super::{CatalogSource, CatalogStore};
use crate::catalog::model::SkillSource;
use crate::error::Result;

const SKILL_COLUMNS: &str = "id, title_en, title_zh, description_en, description_zh, \
     scenario_en, scenario_zh, category, tags_en, tags_zh, source, author, url, \
     is_active, sort_order";

const CATEGORY_COLUMNS: &str = "id, name_en, name_zh, desc_en, desc_zh, color, icon, sort_order";

pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// 打开（必要时创建）数据库文件并建表
    pub async fn open(db_path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(&db_url)
            .await?;

        let store = Self { pool };
        store.init_tables().await?;
        Ok(store)
    }

    async fn init_tables(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name_en TEXT NOT NULL,
                name_zh TEXT NOT NULL,
                desc_en TEXT,
                desc_zh TEXT,
                color TEXT,
                icon TEXT,
                sort_order INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS skills (
                id TEXT PRIMARY KEY,
                title_en TEXT NOT NULL,
                title_zh TEXT NOT NULL,
                description_en TEXT,
                description_zh TEXT,
                scenario_en TEXT,
                scenario_zh TEXT,
                category TEXT NOT NULL,
                tags_en TEXT,
                tags_zh TEXT,
                source TEXT NOT NULL DEFAULT 'community',
                author TEXT,
                url TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                sort_order INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_skills_category ON skills(category)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn tags_to_json(tags: &Option<Vec<String>>) -> Result<Option<String>> {
    Ok(match tags {
        Some(list) => Some(serde_json::to_string(list)?),
        None => None,
    })
}

/// 标签列损坏时按缺失处理
fn tags_from_json(id: &str, raw: Option<String>) -> Option<Vec<String>> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(tags) => Some(tags),
        Err(e) => {
            tracing::debug!("skill {} has malformed tags column: {}", id, e);
            None
        }
    }
}

fn skill_from_row(row: &SqliteRow) -> Result<SkillRecord> {
    let id: String = row.try_get("id")?;
    let source: String = row.try_get("source")?;
    let is_active: i64 = row.try_get("is_active")?;
    Ok(SkillRecord {
        title_en: row.try_get("title_en")?,
        title_zh: row.try_get("title_zh")?,
        description_en: row.try_get("description_en")?,
        description_zh: row.try_get("description_zh")?,
        scenario_en: row.try_get("scenario_en")?,
        scenario_zh: row.try_get("scenario_zh")?,
        category: row.try_get("category")?,
        tags_en: tags_from_json(&id, row.try_get("tags_en")?),
        tags_zh: tags_from_json(&id, row.try_get("tags_zh")?),
        source: Some(SkillSource::from_db(&source)),
        author: row.try_get("author")?,
        url: row.try_get("url")?,
        is_active: Some(is_active != 0),
        sort_order: row.try_get("sort_order")?,
        id,
    })
}

fn category_from_row(row: &SqliteRow) -> Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: row.try_get("id")?,
        name_en: row.try_get("name_en")?,
        name_zh: row.try_get("name_zh")?,
        desc_en: row.try_get("desc_en")?,
        desc_zh: row.try_get("desc_zh")?,
        color: row.try_get("color")?,
        icon: row.try_get("icon")?,
        sort_order: row.try_get("sort_order")?,
    })
}

#[async_trait]
impl CatalogSource for SqliteCatalogStore {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY COALESCE(sort_order, 0) ASC, id ASC",
            CATEGORY_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(category_from_row).collect()
    }

    async fn list_skills(&self) -> Result<Vec<SkillRecord>> {
        let sql = format!(
            "SELECT {} FROM skills WHERE is_active = 1 \
             ORDER BY COALESCE(sort_order, 0) ASC, id ASC",
            SKILL_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(skill_from_row).collect()
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn skills_by_category(&self, category_id: &str) -> Result<Vec<SkillRecord>> {
        let sql = format!(
            "SELECT {} FROM skills WHERE category = ? AND is_active = 1 \
             ORDER BY COALESCE(sort_order, 0) ASC, id ASC",
            SKILL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(skill_from_row).collect()
    }

    async fn skill_by_id(&self, id: &str) -> Result<Option<SkillRecord>> {
        let sql = format!("SELECT {} FROM skills WHERE id = ? LIMIT 1", SKILL_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(skill_from_row).transpose()
    }

    async fn upsert_category(&self, category: &CategoryRecord) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO categories (
                id, name_en, name_zh, desc_en, desc_zh, color, icon, sort_order,
                created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name_en = excluded.name_en,
                name_zh = excluded.name_zh,
                desc_en = COALESCE(excluded.desc_en, categories.desc_en),
                desc_zh = COALESCE(excluded.desc_zh, categories.desc_zh),
                color = COALESCE(excluded.color, categories.color),
                icon = COALESCE(excluded.icon, categories.icon),
                sort_order = COALESCE(excluded.sort_order, categories.sort_order),
                updated_at = excluded.updated_at",
        )
        .bind(&category.id)
        .bind(&category.name_en)
        .bind(&category.name_zh)
        .bind(&category.desc_en)
        .bind(&category.desc_zh)
        .bind(&category.color)
        .bind(&category.icon)
        .bind(category.sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("upsert category {}", category.id);
        Ok(())
    }

    async fn upsert_skill(&self, skill: &SkillRecord) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let tags_en = tags_to_json(&skill.tags_en)?;
        let tags_zh = tags_to_json(&skill.tags_zh)?;

        // 可选列为空时：新建取列默认值，更新保留原值
        sqlx::query(
            "INSERT INTO skills (
                id, title_en, title_zh, description_en, description_zh, scenario_en, scenario_zh,
                category, tags_en, tags_zh, source, author, url, is_active, sort_order,
                created_at, updated_at
             ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, COALESCE(?11, 'community'), ?12, ?13,
                COALESCE(?14, 1), ?15, ?16, ?16
             )
             ON CONFLICT(id) DO UPDATE SET
                title_en = excluded.title_en,
                title_zh = excluded.title_zh,
                description_en = COALESCE(excluded.description_en, skills.description_en),
                description_zh = COALESCE(excluded.description_zh, skills.description_zh),
                scenario_en = COALESCE(excluded.scenario_en, skills.scenario_en),
                scenario_zh = COALESCE(excluded.scenario_zh, skills.scenario_zh),
                category = excluded.category,
                tags_en = COALESCE(excluded.tags_en, skills.tags_en),
                tags_zh = COALESCE(excluded.tags_zh, skills.tags_zh),
                source = COALESCE(?11, skills.source),
                author = COALESCE(excluded.author, skills.author),
                url = COALESCE(excluded.url, skills.url),
                is_active = COALESCE(?14, skills.is_active),
                sort_order = COALESCE(excluded.sort_order, skills.sort_order),
                updated_at = excluded.updated_at",
        )
        .bind(&skill.id)
        .bind(&skill.title_en)
        .bind(&skill.title_zh)
        .bind(&skill.description_en)
        .bind(&skill.description_zh)
        .bind(&skill.scenario_en)
        .bind(&skill.scenario_zh)
        .bind(&skill.category)
        .bind(tags_en)
        .bind(tags_zh)
        .bind(skill.source.map(SkillSource::as_str))
        .bind(&skill.author)
        .bind(&skill.url)
        .bind(skill.is_active.map(i64::from))
        .bind(skill.sort_order)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("upsert skill {}", skill.id);
        Ok(())
    }

    async fn delete_skill(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!("delete skill {} ({} rows)", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn brand_guidelines() -> SkillRecord {
        let mut s =
            SkillRecord::new("brand-guidelines", "Brand Guidelines", "品牌指南", "marketing");
        s.description_en = Some("Enforce brand guidelines".into());
        s.description_zh = Some("强制品牌指南".into());
        s.tags_en = Some(vec!["Brand & Strategy".into()]);
        s.tags_zh = Some(vec!["品牌策略".into()]);
        s.source = Some(SkillSource::Official);
        s.url = Some("https://github.com/anthropics/skills".into());
        s.is_active = Some(true);
        s.sort_order = Some(1);
        s
    }

    async fn skill_ids(store: &SqliteCatalogStore) -> Vec<String> {
        let skills = store.list_skills().await.unwrap();
        skills.into_iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn test_skill_roundtrip_through_sqlite() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();

        store.upsert_skill(&brand_guidelines()).await.unwrap();
        let loaded = store.skill_by_id("brand-guidelines").await.unwrap().unwrap();
        assert_eq!(loaded, brand_guidelines());
        assert!(store.skill_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();

        let category = CategoryRecord::new("marketing", "Marketing & Brand", "市场与品牌");
        store.upsert_category(&category).await.unwrap();
        store.upsert_category(&category).await.unwrap();
        assert_eq!(store.list_categories().await.unwrap().len(), 1);

        store.upsert_skill(&brand_guidelines()).await.unwrap();
        let mut changed = brand_guidelines();
        changed.title_en = "Brand Book".into();
        changed.tags_en = Some(vec!["Brand".into()]);
        store.upsert_skill(&changed).await.unwrap();
        store.upsert_skill(&changed).await.unwrap();

        let skills = store.list_skills().await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0], changed);
    }

    #[tokio::test]
    async fn test_inactive_skills_hidden_from_lists() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();

        let mut retired = SkillRecord::new("retired", "Retired", "已下线", "marketing");
        retired.is_active = Some(false);
        store.upsert_skill(&retired).await.unwrap();
        store.upsert_skill(&brand_guidelines()).await.unwrap();

        let ids: Vec<String> = skill_ids(&store).await;
        assert_eq!(ids, vec!["brand-guidelines"]);
        assert_eq!(store.skills_by_category("marketing").await.unwrap().len(), 1);
        assert!(!store.skill_by_id("retired").await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn test_ordering_by_sort_order_then_id() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();

        for (id, order) in [("c", Some(2)), ("b", Some(1)), ("a", None), ("d", Some(1))] {
            let mut s = SkillRecord::new(id, id, id, "coding");
            s.sort_order = order;
            store.upsert_skill(&s).await.unwrap();
        }

        assert_eq!(skill_ids(&store).await, vec!["a", "b", "d", "c"]);
    }

    #[tokio::test]
    async fn test_delete_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("catalog.db");
        let store = SqliteCatalogStore::open(&path, 1).await.unwrap();
        store.upsert_skill(&brand_guidelines()).await.unwrap();
        let other = SkillRecord::new("other", "Other", "其他", "coding");
        store.upsert_skill(&other).await.unwrap();
        assert!(store.delete_skill("other").await.unwrap());
        assert!(!store.delete_skill("other").await.unwrap());
        store.close().await;

        let reopened = SqliteCatalogStore::open(&path, 1).await.unwrap();
        let skills = reopened.list_skills().await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id, "brand-guidelines");
    }

    #[tokio::test]
    async fn test_partial_upsert_keeps_stored_columns() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();

        let mut retired = brand_guidelines();
        retired.is_active = Some(false);
        store.upsert_skill(&retired).await.unwrap();

        let partial = SkillRecord::new("brand-guidelines", "Brand Book", "品牌手册", "marketing");
        store.upsert_skill(&partial).await.unwrap();

        let stored = store.skill_by_id("brand-guidelines").await.unwrap().unwrap();
        assert_eq!(stored.title_en, "Brand Book");
        assert_eq!(stored.description_en, retired.description_en);
        assert_eq!(stored.tags_en, retired.tags_en);
        assert_eq!(stored.tags_zh, retired.tags_zh);
        assert_eq!(stored.url, retired.url);
        assert_eq!(stored.sort_order, Some(1));
        assert_eq!(stored.source(), SkillSource::Official);
        assert!(!stored.is_active());

        let mut category = CategoryRecord::new("marketing", "Marketing", "市场");
        category.color = Some("#f00".into());
        category.sort_order = Some(2);
        store.upsert_category(&category).await.unwrap();
        store
            .upsert_category(&CategoryRecord::new("marketing", "Marketing & Brand", "市场与品牌"))
            .await
            .unwrap();
        let categories = store.list_categories().await.unwrap();
        assert_eq!(categories[0].name_en, "Marketing & Brand");
        assert_eq!(categories[0].color.as_deref(), Some("#f00"));
        assert_eq!(categories[0].sort_order, Some(2));
    }

    #[tokio::test]
    async fn test_new_row_takes_column_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();
        store
            .upsert_skill(&SkillRecord::new("plain", "Plain", "普通", "coding"))
            .await
            .unwrap();
        let stored = store.skill_by_id("plain").await.unwrap().unwrap();
        assert_eq!(stored.source, Some(SkillSource::Community));
        assert_eq!(stored.is_active, Some(true));
    }

    #[tokio::test]
    async fn test_malformed_tags_column_reads_as_missing() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::open(dir.path().join("catalog.db"), 1).await.unwrap();
        store.upsert_skill(&brand_guidelines()).await.unwrap();

        sqlx::query("UPDATE skills SET tags_en = ?, tags_zh = ? WHERE id = ?")
            .bind("not json [")
            .bind("{\"zh\": 1}")
            .bind("brand-guidelines")
            .execute(&store.pool)
            .await
            .unwrap();

        let skills = store.list_skills().await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].tags_en, None);
        assert_eq!(skills[0].tags_zh, None);

        let skill = crate::catalog::canonicalize_skill(skills[0].clone());
        assert!(skill.tags.en.is_empty());
        assert!(skill.tags.zh.is_empty());
        assert_eq!(skill.description.en, "Enforce brand guidelines");
    }
}
