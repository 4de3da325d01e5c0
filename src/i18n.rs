//! 界面文案（en / zh）
//!
//! 只覆盖列表展示用到的少量固定文案；技能与分类自身的双语内容在数据里。

use crate::catalog::model::Language;

const EN: &[(&str, &str)] = &[
    ("hero.tagline", "OPEN SOURCE SKILLS LIBRARY"),
    ("filter.all", "ALL SKILLS"),
    ("empty.message", "No skills found in this category."),
    ("card.official", "Official"),
    ("card.community", "Community"),
    ("card.scenario", "Scenario:"),
    ("card.by", "By"),
    ("card.recommended", "★ Highly Recommended"),
    ("source.live", "live data"),
    ("source.static", "built-in data"),
    ("source.error", "built-in data, live source unavailable"),
    ("source.loading", "loading"),
];

const ZH: &[(&str, &str)] = &[
    ("hero.tagline", "开源技能库"),
    ("filter.all", "所有技能"),
    ("empty.message", "在此分类中未找到技能。"),
    ("card.official", "官方"),
    ("card.community", "社区"),
    ("card.scenario", "场景："),
    ("card.by", "作者："),
    ("card.recommended", "★ 强烈推荐"),
    ("source.live", "实时数据"),
    ("source.static", "内置数据"),
    ("source.error", "内置数据，实时数据不可用"),
    ("source.loading", "加载中"),
];

fn table(lang: Language) -> &'static [(&'static str, &'static str)] {
    match lang {
        Language::En => EN,
        Language::Zh => ZH,
    }
}

fn lookup(lang: Language, key: &str) -> Option<&'static str> {
    table(lang).iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// 取文案：当前语言缺失时退回英文，仍缺失则原样返回 key
pub fn t<'a>(lang: Language, key: &'a str) -> &'a str {
    lookup(lang, key)
        .or_else(|| lookup(Language::En, key))
        .unwrap_or(key)
}
