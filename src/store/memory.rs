//! 内存存储：无数据库时的退路，也用于测试

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::records::{sort_key, CategoryRecord, SkillRecord};
use super::{CatalogSource, CatalogStore};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    categories: RwLock<HashMap<String, CategoryRecord>>,
    skills: RwLock<HashMap<String, SkillRecord>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用给定记录预填充
    pub fn with_records(categories: Vec<CategoryRecord>, skills: Vec<SkillRecord>) -> Self {
        Self {
            categories: RwLock::new(categories.into_iter().map(|c| (c.id.clone(), c)).collect()),
            skills: RwLock::new(skills.into_iter().map(|s| (s.id.clone(), s)).collect()),
        }
    }

    async fn active_skills_where<F>(&self, pred: F) -> Vec<SkillRecord>
    where
        F: Fn(&SkillRecord) -> bool,
    {
        let skills = self.skills.read().await;
        let mut list: Vec<SkillRecord> = skills
            .values()
            .filter(|s| s.is_active() && pred(s))
            .cloned()
            .collect();
        list.sort_by_key(|s| sort_key(s.sort_order, &s.id));
        list
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalogStore {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        let categories = self.categories.read().await;
        let mut list: Vec<CategoryRecord> = categories.values().cloned().collect();
        list.sort_by_key(|c| sort_key(c.sort_order, &c.id));
        Ok(list)
    }

    async fn list_skills(&self) -> Result<Vec<SkillRecord>> {
        Ok(self.active_skills_where(|_| true).await)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn skills_by_category(&self, category_id: &str) -> Result<Vec<SkillRecord>> {
        Ok(self.active_skills_where(|s| s.category == category_id).await)
    }

    async fn skill_by_id(&self, id: &str) -> Result<Option<SkillRecord>> {
        Ok(self.skills.read().await.get(id).cloned())
    }

    async fn upsert_category(&self, category: &CategoryRecord) -> Result<()> {
        tracing::debug!("upsert category {}", category.id);
        let mut categories = self.categories.write().await;
        match categories.get_mut(&category.id) {
            Some(existing) => existing.merge(category),
            None => {
                categories.insert(category.id.clone(), category.clone());
            }
        }
        Ok(())
    }

    async fn upsert_skill(&self, skill: &SkillRecord) -> Result<()> {
        tracing::debug!("upsert skill {}", skill.id);
        let mut skills = self.skills.write().await;
        match skills.get_mut(&skill.id) {
            Some(existing) => existing.merge(skill),
            None => {
                // 与 SQLite 列默认值保持一致
                let mut record = skill.clone();
                record.source = Some(skill.source());
                record.is_active = Some(skill.is_active());
                skills.insert(skill.id.clone(), record);
            }
        }
        Ok(())
    }

    async fn delete_skill(&self, id: &str) -> Result<bool> {
        tracing::debug!("delete skill {}", id);
        Ok(self.skills.write().await.remove(id).is_some())
    }
}
