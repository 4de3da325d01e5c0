//! 数据库记录形状：扁平的双语列（titleEn / titleZh / descriptionEn ...）
//!
//! 既是存储层的行结构，也是 HTTP 接口与导入操作的 JSON 负载（camelCase）。

use serde::{Deserialize, Serialize};

use crate::catalog::model::SkillSource;

/// 分类记录（categories 表）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub name_en: String,
    pub name_zh: String,
    #[serde(default)]
    pub desc_en: Option<String>,
    #[serde(default)]
    pub desc_zh: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

/// 技能记录（skills 表）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub id: String,
    pub title_en: String,
    pub title_zh: String,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub description_zh: Option<String>,
    #[serde(default)]
    pub scenario_en: Option<String>,
    #[serde(default)]
    pub scenario_zh: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags_en: Option<Vec<String>>,
    #[serde(default)]
    pub tags_zh: Option<Vec<String>>,
    /// 缺省时写入 community；更新时不改动已有值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SkillSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// 缺省时新建为启用；更新时不改动已有值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl SkillRecord {
    /// 仅含必填列的记录，其余取列默认值
    pub fn new(
        id: impl Into<String>,
        title_en: impl Into<String>,
        title_zh: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title_en: title_en.into(),
            title_zh: title_zh.into(),
            description_en: None,
            description_zh: None,
            scenario_en: None,
            scenario_zh: None,
            category: category.into(),
            tags_en: None,
            tags_zh: None,
            source: None,
            author: None,
            url: None,
            is_active: None,
            sort_order: None,
        }
    }

    /// 来源，缺省为 community
    pub fn source(&self) -> SkillSource {
        self.source.unwrap_or_default()
    }

    /// 是否启用，缺省为启用
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// 用 `patch` 中给出的字段覆盖自身，未给出的可选字段保持原值
    pub fn merge(&mut self, patch: &SkillRecord) {
        fn keep<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        self.title_en.clone_from(&patch.title_en);
        self.title_zh.clone_from(&patch.title_zh);
        self.category.clone_from(&patch.category);
        keep(&mut self.description_en, &patch.description_en);
        keep(&mut self.description_zh, &patch.description_zh);
        keep(&mut self.scenario_en, &patch.scenario_en);
        keep(&mut self.scenario_zh, &patch.scenario_zh);
        keep(&mut self.tags_en, &patch.tags_en);
        keep(&mut self.tags_zh, &patch.tags_zh);
        keep(&mut self.source, &patch.source);
        keep(&mut self.author, &patch.author);
        keep(&mut self.url, &patch.url);
        keep(&mut self.is_active, &patch.is_active);
        keep(&mut self.sort_order, &patch.sort_order);
    }
}

impl CategoryRecord {
    pub fn new(
        id: impl Into<String>,
        name_en: impl Into<String>,
        name_zh: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name_en: name_en.into(),
            name_zh: name_zh.into(),
            desc_en: None,
            desc_zh: None,
            color: None,
            icon: None,
            sort_order: None,
        }
    }

    /// 名称总是覆盖；描述、颜色、图标、排序仅在给出时覆盖
    pub fn merge(&mut self, patch: &CategoryRecord) {
        self.name_en.clone_from(&patch.name_en);
        self.name_zh.clone_from(&patch.name_zh);
        for (slot, value) in [
            (&mut self.desc_en, &patch.desc_en),
            (&mut self.desc_zh, &patch.desc_zh),
            (&mut self.color, &patch.color),
            (&mut self.icon, &patch.icon),
        ] {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        if patch.sort_order.is_some() {
            self.sort_order = patch.sort_order;
        }
    }
}

/// 列表排序键：sortOrder（缺省 0）升序，再按 id 保证稳定
pub(crate) fn sort_key(sort_order: Option<i64>, id: &str) -> (i64, String) {
    (sort_order.unwrap_or(0), id.to_string())
}
