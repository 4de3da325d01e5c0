//! 管理员导入：把一批分类与技能写入可写存储
//!
//! 先写分类再写技能，逐条按 id 覆盖；同一负载重复导入结果不变。
//! 中途失败立即返回，已写入的条目保留，错误里带上已写入数量。

use serde::{Deserialize, Serialize};

use super::records::{CategoryRecord, SkillRecord};
use super::CatalogStore;
use crate::catalog::model::SkillSource;
use crate::catalog::static_data::StaticDataset;
use crate::error::{CatalogError, Result};

/// 调用方身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Admin,
}

impl Caller {
    /// 提交的令牌与配置的管理令牌一致才是管理员；未配置令牌时一律匿名
    pub fn from_token(presented: Option<&str>, configured: Option<&str>) -> Self {
        match (presented, configured) {
            (Some(p), Some(c)) if !c.is_empty() && p == c => Caller::Admin,
            _ => Caller::Anonymous,
        }
    }

    pub fn require_admin(self) -> Result<()> {
        match self {
            Caller::Admin => Ok(()),
            Caller::Anonymous => Err(CatalogError::Unauthorized),
        }
    }
}

/// 导入负载
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedPayload {
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl SeedPayload {
    /// 由内置数据集生成负载，sortOrder 取列表位置（从 1 开始）
    pub fn from_static(dataset: &StaticDataset) -> Self {
        let categories = dataset
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| CategoryRecord {
                id: c.id.clone(),
                name_en: c.name.en.clone(),
                name_zh: c.name.zh.clone(),
                desc_en: non_empty(&c.description.en),
                desc_zh: non_empty(&c.description.zh),
                color: Some(c.color.clone()),
                icon: Some(c.icon.clone()),
                sort_order: Some(i as i64 + 1),
            })
            .collect();

        let skills = dataset
            .skills
            .iter()
            .enumerate()
            .map(|(i, s)| SkillRecord {
                id: s.id.clone(),
                title_en: s.name.clone(),
                title_zh: s.name_zh.clone().unwrap_or_else(|| s.name.clone()),
                description_en: non_empty(&s.description.en),
                description_zh: non_empty(&s.description.zh),
                scenario_en: non_empty(&s.scenario.en),
                scenario_zh: non_empty(&s.scenario.zh),
                category: s.category.clone(),
                tags_en: Some(s.tags.en.clone()),
                tags_zh: Some(s.tags.zh.clone()),
                source: Some(if s.is_official {
                    SkillSource::Official
                } else {
                    SkillSource::Community
                }),
                author: s.author.clone(),
                url: s.url.clone(),
                // 不携带启用状态：重复导入不会重新启用已下线的技能
                is_active: None,
                sort_order: Some(i as i64 + 1),
            })
            .collect();

        Self { categories, skills }
    }
}

/// 导入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub categories_count: usize,
    pub skills_count: usize,
}

pub async fn seed_catalog(
    store: &dyn CatalogStore,
    caller: Caller,
    payload: &SeedPayload,
) -> Result<SeedReport> {
    caller.require_admin()?;

    let mut categories_written = 0;
    for category in &payload.categories {
        if let Err(e) = store.upsert_category(category).await {
            return Err(seed_failed(categories_written, 0, e));
        }
        categories_written += 1;
    }

    let mut skills_written = 0;
    for skill in &payload.skills {
        if let Err(e) = store.upsert_skill(skill).await {
            return Err(seed_failed(categories_written, skills_written, e));
        }
        skills_written += 1;
    }

    tracing::info!(
        "Seeded catalog: {} categories, {} skills",
        categories_written,
        skills_written
    );
    Ok(SeedReport {
        categories_count: categories_written,
        skills_count: skills_written,
    })
}

fn seed_failed(
    categories_written: usize,
    skills_written: usize,
    source: CatalogError,
) -> CatalogError {
    tracing::warn!(
        "Seed aborted after {} categories, {} skills: {}",
        categories_written,
        skills_written,
        source
    );
    CatalogError::SeedFailed {
        categories_written,
        skills_written,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::static_data::static_dataset;
    use crate::store::{CatalogSource, MemoryCatalogStore};
    use async_trait::async_trait;

    #[test]
    fn test_caller_from_token() {
        assert_eq!(Caller::from_token(Some("s3cret"), Some("s3cret")), Caller::Admin);
        assert_eq!(Caller::from_token(Some("wrong"), Some("s3cret")), Caller::Anonymous);
        assert_eq!(Caller::from_token(None, Some("s3cret")), Caller::Anonymous);
        assert_eq!(Caller::from_token(Some(""), Some("")), Caller::Anonymous);
        assert_eq!(Caller::from_token(Some("s3cret"), None), Caller::Anonymous);
    }

    #[test]
    fn test_payload_from_static() {
        let payload = SeedPayload::from_static(static_dataset());
        assert_eq!(payload.categories.len(), static_dataset().categories.len());
        assert_eq!(payload.skills.len(), static_dataset().skills.len());
        assert_eq!(payload.categories[0].sort_order, Some(1));
        assert_eq!(payload.skills[1].sort_order, Some(2));

        let official = payload.skills.iter().find(|s| s.id == "brand-guidelines").unwrap();
        assert_eq!(official.source(), SkillSource::Official);
        let community = payload.skills.iter().find(|s| s.id == "brand-voice-analyzer").unwrap();
        assert_eq!(community.source(), SkillSource::Community);
        assert_eq!(community.author.as_deref(), Some("alirezarezvani"));
    }

    #[tokio::test]
    async fn test_anonymous_is_rejected_without_writes() {
        let store = MemoryCatalogStore::new();
        let payload = SeedPayload::from_static(static_dataset());
        let err = seed_catalog(&store, Caller::Anonymous, &payload).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized));
        assert!(store.list_skills().await.unwrap().is_empty());
        assert!(store.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_twice_is_idempotent() {
        let store = MemoryCatalogStore::new();
        let payload = SeedPayload::from_static(static_dataset());

        let first = seed_catalog(&store, Caller::Admin, &payload).await.unwrap();
        let skills_after_first = store.list_skills().await.unwrap();
        let categories_after_first = store.list_categories().await.unwrap();

        let second = seed_catalog(&store, Caller::Admin, &payload).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.skills_count, payload.skills.len());
        assert_eq!(store.list_skills().await.unwrap(), skills_after_first);
        assert_eq!(store.list_categories().await.unwrap(), categories_after_first);
    }

    #[tokio::test]
    async fn test_reseed_keeps_disabled_skill_disabled() {
        let store = MemoryCatalogStore::new();
        let payload = SeedPayload::from_static(static_dataset());
        seed_catalog(&store, Caller::Admin, &payload).await.unwrap();

        let mut disabled = store.skill_by_id("brand-guidelines").await.unwrap().unwrap();
        disabled.is_active = Some(false);
        store.upsert_skill(&disabled).await.unwrap();

        seed_catalog(&store, Caller::Admin, &payload).await.unwrap();
        let stored = store.skill_by_id("brand-guidelines").await.unwrap().unwrap();
        assert!(!stored.is_active());
        assert_eq!(store.list_skills().await.unwrap().len(), payload.skills.len() - 1);
    }

    /// 写到指定技能时报错的存储
    struct FailingStore {
        inner: MemoryCatalogStore,
        fail_on: String,
    }

    #[async_trait]
    impl CatalogSource for FailingStore {
        async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
            self.inner.list_categories().await
        }

        async fn list_skills(&self) -> Result<Vec<SkillRecord>> {
            self.inner.list_skills().await
        }
    }

    #[async_trait]
    impl CatalogStore for FailingStore {
        async fn skills_by_category(&self, category_id: &str) -> Result<Vec<SkillRecord>> {
            self.inner.skills_by_category(category_id).await
        }

        async fn skill_by_id(&self, id: &str) -> Result<Option<SkillRecord>> {
            self.inner.skill_by_id(id).await
        }

        async fn upsert_category(&self, category: &CategoryRecord) -> Result<()> {
            self.inner.upsert_category(category).await
        }

        async fn upsert_skill(&self, skill: &SkillRecord) -> Result<()> {
            if skill.id == self.fail_on {
                return Err(CatalogError::Config("disk full".into()));
            }
            self.inner.upsert_skill(skill).await
        }

        async fn delete_skill(&self, id: &str) -> Result<bool> {
            self.inner.delete_skill(id).await
        }
    }

    #[tokio::test]
    async fn test_partial_failure_reports_counts_and_keeps_writes() {
        let payload = SeedPayload::from_static(static_dataset());
        let store = FailingStore {
            inner: MemoryCatalogStore::new(),
            fail_on: payload.skills[2].id.clone(),
        };

        let err = seed_catalog(&store, Caller::Admin, &payload).await.unwrap_err();
        match err {
            CatalogError::SeedFailed {
                categories_written,
                skills_written,
                ..
            } => {
                assert_eq!(categories_written, payload.categories.len());
                assert_eq!(skills_written, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.list_skills().await.unwrap().len(), 2);
    }
}
