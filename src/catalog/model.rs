//! 实体模型：技能（Skill）、分类（Category）与双语字段
//!
//! 只描述数据形状，不含业务逻辑。所有可选的文本字段都在规范化阶段补成空串 / 空列表，
//! 过滤引擎读到的永远是完整的结构。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// 解析语言代码，忽略大小写与地区后缀（zh-CN、zh_TW 均视为 zh）
    pub fn parse(value: &str) -> Option<Self> {
        let lang = value
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::parse(s).ok_or_else(|| format!("unsupported language: {}", s))
    }
}

/// 按语言成对存放的值（en / zh），缺失的一侧反序列化为默认值
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(default)]
    pub en: T,
    #[serde(default)]
    pub zh: T,
}

impl<T> Localized<T> {
    pub fn new(en: T, zh: T) -> Self {
        Self { en, zh }
    }

    pub fn get(&self, lang: Language) -> &T {
        match lang {
            Language::En => &self.en,
            Language::Zh => &self.zh,
        }
    }
}

impl Localized<String> {
    /// 取指定语言文本；为空时退回英文
    pub fn get_or_en(&self, lang: Language) -> &str {
        let value = self.get(lang);
        if value.is_empty() {
            &self.en
        } else {
            value
        }
    }
}

/// 技能来源（数据库中的 source 枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    Official,
    #[default]
    Community,
}

impl SkillSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillSource::Official => "official",
            SkillSource::Community => "community",
        }
    }

    /// 未知取值按 community 处理（与列默认值一致）
    pub fn from_db(value: &str) -> Self {
        match value {
            "official" => SkillSource::Official,
            _ => SkillSource::Community,
        }
    }
}

/// 规范化后的技能条目（过滤引擎与展示层的唯一输入形状）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    /// 展示名，参与检索
    pub name: String,
    /// 中文展示名，仅用于展示，不参与检索
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_zh: Option<String>,
    #[serde(default)]
    pub description: Localized<String>,
    #[serde(default)]
    pub scenario: Localized<String>,
    #[serde(default)]
    pub tags: Localized<Vec<String>>,
    pub category: String,
    #[serde(default)]
    pub is_official: bool,
    #[serde(default)]
    pub is_community: bool,
    #[serde(default)]
    pub is_highlight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Skill {
    /// 指定语言下的展示名
    pub fn display_name(&self, lang: Language) -> &str {
        match (lang, self.name_zh.as_deref()) {
            (Language::Zh, Some(zh)) if !zh.is_empty() => zh,
            _ => &self.name,
        }
    }
}

/// 规范化后的分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: Localized<String>,
    #[serde(default)]
    pub description: Localized<String>,
    #[serde(default = "default_category_icon")]
    pub icon: String,
    #[serde(default = "default_category_color")]
    pub color: String,
    #[serde(default)]
    pub sort_order: i64,
}

pub const DEFAULT_CATEGORY_ICON: &str = "/images/hero-banner.png";
pub const DEFAULT_CATEGORY_COLOR: &str = "var(--primary)";

pub fn default_category_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

pub fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}
