//! 内置静态数据集
//!
//! 数据文件 data/catalog.toml 在编译期嵌入，首次访问时解析并缓存，运行期只读。

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Deserialize;

use super::model::{Category, Skill};
use crate::error::{CatalogError, Result};

const CATALOG_TOML: &str = include_str!("../../data/catalog.toml");

/// 静态技能与分类列表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticDataset {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl StaticDataset {
    /// 解析 TOML 并校验 id 唯一
    pub fn from_toml(content: &str) -> Result<Self> {
        let dataset: StaticDataset =
            toml::from_str(content).map_err(|e| CatalogError::StaticData(e.to_string()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &self.categories {
            if !seen.insert(c.id.as_str()) {
                return Err(CatalogError::StaticData(format!("duplicate category id: {}", c.id)));
            }
        }

        let mut seen_skills = HashSet::new();
        for s in &self.skills {
            if !seen_skills.insert(s.id.as_str()) {
                return Err(CatalogError::StaticData(format!("duplicate skill id: {}", s.id)));
            }
            // 悬空分类引用只会让该技能无法被分类过滤命中，不算错误
            if !seen.contains(s.category.as_str()) {
                tracing::warn!(
                    skill = %s.id,
                    category = %s.category,
                    "static skill references unknown category"
                );
            }
        }
        Ok(())
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }
}

/// 全局静态数据集（解析失败时记录错误并返回空数据集）
pub fn static_dataset() -> &'static StaticDataset {
    static DATASET: OnceLock<StaticDataset> = OnceLock::new();
    DATASET.get_or_init(|| match StaticDataset::from_toml(CATALOG_TOML) {
        Ok(dataset) => {
            tracing::debug!(
                "Loaded static dataset: {} categories, {} skills",
                dataset.categories.len(),
                dataset.skills.len()
            );
            dataset
        }
        Err(e) => {
            tracing::error!("Failed to parse embedded static dataset: {}", e);
            StaticDataset::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Language;

    #[test]
    fn test_embedded_dataset_parses() {
        let dataset = StaticDataset::from_toml(CATALOG_TOML).unwrap();
        assert_eq!(dataset.categories.len(), 6);
        assert_eq!(dataset.skills.len(), 39);
        assert_eq!(static_dataset().skills.len(), 39);
    }

    #[test]
    fn test_every_skill_has_known_category_and_both_languages() {
        let dataset = static_dataset();
        for skill in &dataset.skills {
            assert!(dataset.category(&skill.category).is_some(), "{}", skill.id);
            for lang in Language::ALL {
                assert!(!skill.description.get(lang).is_empty(), "{} {}", skill.id, lang);
                assert!(!skill.scenario.get(lang).is_empty(), "{} {}", skill.id, lang);
                assert!(!skill.tags.get(lang).is_empty(), "{} {}", skill.id, lang);
            }
        }
    }

    #[test]
    fn test_sample_entries() {
        let dataset = static_dataset();
        let brand = dataset.skill("brand-guidelines").unwrap();
        assert_eq!(brand.category, "marketing");
        assert!(brand.is_official);
        assert_eq!(brand.tags.zh, vec!["品牌策略".to_string()]);

        let analyzer = dataset.skill("brand-voice-analyzer").unwrap();
        assert!(analyzer.is_community);
        assert_eq!(analyzer.author.as_deref(), Some("alirezarezvani"));

        let writer = dataset.skill("content-research-writer").unwrap();
        assert!(writer.is_highlight);
        assert!(!writer.is_official && !writer.is_community);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"
[[categories]]
id = "coding"
name = { en = "Coding", zh = "编程" }

[[categories]]
id = "coding"
name = { en = "Coding", zh = "编程" }
"#;
        let err = StaticDataset::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("duplicate category id"));
    }

    #[test]
    fn test_missing_localized_members_default_to_empty() {
        let content = r#"
[[skills]]
id = "bare"
name = "Bare"
category = "coding"
description = { en = "Only English" }
"#;
        let dataset = StaticDataset::from_toml(content).unwrap();
        let skill = &dataset.skills[0];
        assert_eq!(skill.description.zh, "");
        assert!(skill.tags.en.is_empty());
        assert!(skill.scenario.en.is_empty());
    }
}
