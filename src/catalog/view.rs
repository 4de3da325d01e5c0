//! 展示投影：把解析结果 + 当前分类 + 检索词整理成按语言本地化的卡片列表
//!
//! CLI 用 [`CatalogView::render_text`] 输出文本，Web 接口直接序列化为 JSON。

use std::fmt;

use serde::Serialize;

use super::filter::{filter_skills, CategorySelection};
use super::model::{Category, Language, Skill};
use super::resolver::ResolvedCatalog;
use crate::i18n::t;

/// 单个技能卡片
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario: String,
    pub tags: Vec<String>,
    pub category: String,
    pub is_official: bool,
    pub is_community: bool,
    pub is_highlight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SkillCard {
    /// 按语言取文本；该语言为空时用英文
    pub fn from_skill(skill: &Skill, lang: Language) -> Self {
        let tags = if skill.tags.get(lang).is_empty() {
            &skill.tags.en
        } else {
            skill.tags.get(lang)
        };
        Self {
            id: skill.id.clone(),
            name: skill.display_name(lang).to_string(),
            description: skill.description.get_or_en(lang).to_string(),
            scenario: skill.scenario.get_or_en(lang).to_string(),
            tags: tags.clone(),
            category: skill.category.clone(),
            is_official: skill.is_official,
            is_community: skill.is_community,
            is_highlight: skill.is_highlight,
            author: skill.author.clone(),
            url: skill.url.clone(),
        }
    }
}

/// 选中某个分类时展示的分类头
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHeader {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl CategoryHeader {
    fn from_category(category: &Category, lang: Language) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.get_or_en(lang).to_string(),
            description: category.description.get_or_en(lang).to_string(),
            icon: category.icon.clone(),
            color: category.color.clone(),
        }
    }
}

/// 分类筛选条上的一项（首项为「全部」）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChip {
    pub id: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub language: Language,
    pub active_category: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<CategoryHeader>,
    pub categories: Vec<CategoryChip>,
    pub skills: Vec<SkillCard>,
    pub is_empty: bool,
    pub is_loading: bool,
    pub is_from_database: bool,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl CatalogView {
    pub fn build(
        resolved: &ResolvedCatalog,
        lang: Language,
        selection: &CategorySelection,
        query: &str,
    ) -> Self {
        let skills: Vec<SkillCard> = filter_skills(&resolved.skills, selection, query)
            .into_iter()
            .map(|s| SkillCard::from_skill(s, lang))
            .collect();

        let header = match selection {
            CategorySelection::All => None,
            CategorySelection::Category(id) => resolved
                .category(id)
                .map(|c| CategoryHeader::from_category(c, lang)),
        };

        let mut categories = vec![CategoryChip {
            id: CategorySelection::All.as_str().to_string(),
            label: t(lang, "filter.all").to_string(),
            active: *selection == CategorySelection::All,
        }];
        categories.extend(resolved.categories.iter().map(|c| CategoryChip {
            id: c.id.clone(),
            label: c.name.get_or_en(lang).to_string(),
            active: selection.as_str() == c.id,
        }));

        let is_empty = skills.is_empty();
        Self {
            language: lang,
            active_category: selection.as_str().to_string(),
            query: query.to_string(),
            header,
            categories,
            skills,
            is_empty,
            is_loading: resolved.is_loading,
            is_from_database: resolved.is_from_database,
            is_error: resolved.is_error,
            empty_message: is_empty.then(|| t(lang, "empty.message").to_string()),
        }
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lang = self.language;
        let source = if self.is_loading {
            t(lang, "source.loading")
        } else if self.is_from_database {
            t(lang, "source.live")
        } else if self.is_error {
            t(lang, "source.error")
        } else {
            t(lang, "source.static")
        };

        match &self.header {
            Some(h) => {
                writeln!(f, "== {} ==", h.name)?;
                if !h.description.is_empty() {
                    writeln!(f, "{}", h.description)?;
                }
            }
            None => {
                writeln!(f, "{}", t(lang, "hero.tagline"))?;
                writeln!(f, "== {} ==", t(lang, "filter.all"))?;
            }
        }
        writeln!(f, "({}, {})", source, self.skills.len())?;

        if let Some(msg) = &self.empty_message {
            writeln!(f)?;
            return writeln!(f, "{}", msg);
        }

        for card in &self.skills {
            writeln!(f)?;
            write!(f, "* {} [{}]", card.name, card.id)?;
            if card.is_official {
                write!(f, " ({})", t(lang, "card.official"))?;
            }
            if card.is_community {
                write!(f, " ({})", t(lang, "card.community"))?;
            }
            writeln!(f)?;
            if !card.tags.is_empty() {
                let tags: Vec<String> = card.tags.iter().map(|tag| format!("#{}", tag)).collect();
                writeln!(f, "  {}", tags.join(" "))?;
            }
            if !card.description.is_empty() {
                writeln!(f, "  {}", card.description)?;
            }
            if !card.scenario.is_empty() {
                writeln!(f, "  {} {}", t(lang, "card.scenario"), card.scenario)?;
            }
            if let Some(author) = &card.author {
                writeln!(f, "  {} {}", t(lang, "card.by"), author)?;
            }
            if card.is_highlight {
                writeln!(f, "  {}", t(lang, "card.recommended"))?;
            }
            if let Some(url) = &card.url {
                writeln!(f, "  {}", url)?;
            }
        }
        Ok(())
    }
}
