//! 过滤引擎：分类过滤 + 多字段、双语、忽略大小写的子串检索
//!
//! 纯函数，不持有状态；输出保持输入的相对顺序。

use serde::{Deserialize, Serialize};

use super::model::Skill;

/// 「全部」分类的哨兵值
pub const ALL_CATEGORIES: &str = "all";

/// 当前选中的分类：哨兵 `all` 或某个分类 id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategorySelection {
    #[default]
    All,
    Category(String),
}

impl CategorySelection {
    /// 按字面解析，大小写敏感；未知 id 不报错，只是匹配不到任何技能
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategorySelection::All
        } else {
            CategorySelection::Category(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategorySelection::All => ALL_CATEGORIES,
            CategorySelection::Category(id) => id,
        }
    }

    pub fn matches(&self, skill: &Skill) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Category(id) => skill.category == *id,
        }
    }
}

impl From<String> for CategorySelection {
    fn from(value: String) -> Self {
        CategorySelection::parse(&value)
    }
}

impl From<CategorySelection> for String {
    fn from(value: CategorySelection) -> Self {
        value.as_str().to_string()
    }
}

/// 规范化检索词：去首尾空白后小写；空串表示不做文本过滤
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// 技能是否命中已规范化（小写）的检索词：任一字段、任一语言包含即命中
pub fn matches_query(skill: &Skill, needle: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(needle);

    hit(&skill.name)
        || hit(&skill.description.en)
        || hit(&skill.description.zh)
        || hit(&skill.scenario.en)
        || hit(&skill.scenario.zh)
        || skill.tags.en.iter().any(|t| hit(t))
        || skill.tags.zh.iter().any(|t| hit(t))
        || skill.author.as_deref().is_some_and(|a| hit(a))
}

/// 先按分类、再按检索词过滤，两者取交集
pub fn filter_skills<'a>(
    skills: &'a [Skill],
    category: &CategorySelection,
    query: &str,
) -> Vec<&'a Skill> {
    let needle = normalize_query(query);
    skills
        .iter()
        .filter(|s| category.matches(s))
        .filter(|s| match needle.as_deref() {
            Some(q) => matches_query(s, q),
            None => true,
        })
        .collect()
}
