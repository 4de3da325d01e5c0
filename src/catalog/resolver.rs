//! 数据源解析器：在实时数据与内置数据集之间二选一
//!
//! 技能与分类两路拉取并发进行、各自独立完成；两路都结束后由 [`decide`] 给出结论：
//! 任一路失败，或技能列表为空，则技能与分类**一起**回退到内置数据集，不做部分合并。

use std::future::Future;
use std::sync::Arc;

use super::model::{
    default_category_color, default_category_icon, Category, Localized, Skill, SkillSource,
};
use super::static_data::{static_dataset, StaticDataset};
use crate::error::CatalogError;
use crate::store::{CatalogSource, CategoryRecord, SkillRecord};

/// 单路拉取的状态
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

impl<T> From<Result<Vec<T>, CatalogError>> for FetchState<T> {
    fn from(result: Result<Vec<T>, CatalogError>) -> Self {
        match result {
            Ok(items) => FetchState::Loaded(items),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }
}

/// 回退原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    SkillsFailed(String),
    CategoriesFailed(String),
    /// 技能表为空（未导入与确实为空不作区分）
    SkillsEmpty,
}

/// 解析结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDecision {
    Loading,
    LiveOk,
    Fallback(FallbackReason),
}

/// 状态转移：仅由两路拉取状态决定
pub fn decide<S, C>(skills: &FetchState<S>, categories: &FetchState<C>) -> SourceDecision {
    if skills.is_loading() || categories.is_loading() {
        return SourceDecision::Loading;
    }
    if let FetchState::Failed(e) = skills {
        return SourceDecision::Fallback(FallbackReason::SkillsFailed(e.clone()));
    }
    if let FetchState::Failed(e) = categories {
        return SourceDecision::Fallback(FallbackReason::CategoriesFailed(e.clone()));
    }
    if matches!(skills, FetchState::Loaded(list) if list.is_empty()) {
        return SourceDecision::Fallback(FallbackReason::SkillsEmpty);
    }
    SourceDecision::LiveOk
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// 扁平记录 -> 规范化技能；缺失文本补空串、缺失标签补空列表
pub fn canonicalize_skill(record: SkillRecord) -> Skill {
    let source = record.source();
    let name_zh = Some(record.title_zh).filter(|zh| !zh.is_empty() && *zh != record.title_en);
    Skill {
        id: record.id,
        name: record.title_en,
        name_zh,
        description: Localized::new(
            record.description_en.unwrap_or_default(),
            record.description_zh.unwrap_or_default(),
        ),
        scenario: Localized::new(
            record.scenario_en.unwrap_or_default(),
            record.scenario_zh.unwrap_or_default(),
        ),
        tags: Localized::new(
            record.tags_en.unwrap_or_default(),
            record.tags_zh.unwrap_or_default(),
        ),
        category: record.category,
        is_official: source == SkillSource::Official,
        is_community: source == SkillSource::Community,
        is_highlight: false,
        author: non_empty(record.author),
        url: non_empty(record.url),
    }
}

/// 扁平记录 -> 规范化分类；图标与颜色缺省时取默认值
pub fn canonicalize_category(record: CategoryRecord) -> Category {
    Category {
        id: record.id,
        name: Localized::new(record.name_en, record.name_zh),
        description: Localized::new(
            record.desc_en.unwrap_or_default(),
            record.desc_zh.unwrap_or_default(),
        ),
        icon: non_empty(record.icon).unwrap_or_else(default_category_icon),
        color: non_empty(record.color).unwrap_or_else(default_category_color),
        sort_order: record.sort_order.unwrap_or(0),
    }
}

/// 一次渲染所用的权威数据
#[derive(Debug, Clone)]
pub struct ResolvedCatalog {
    pub skills: Vec<Skill>,
    pub categories: Vec<Category>,
    /// 仍在加载时，skills / categories 为内置数据占位，并非权威结果
    pub is_loading: bool,
    /// 仅当两路实时数据都被采用时为 true
    pub is_from_database: bool,
    /// 两路拉取都失败（此时展示的是内置数据）
    pub is_error: bool,
    pub decision: SourceDecision,
}

impl ResolvedCatalog {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }
}

/// 根据两路拉取结果得出本次使用的数据
pub fn resolve(
    skills: FetchState<SkillRecord>,
    categories: FetchState<CategoryRecord>,
    fallback: &StaticDataset,
) -> ResolvedCatalog {
    let decision = decide(&skills, &categories);
    let is_error = matches!(
        (&skills, &categories),
        (FetchState::Failed(_), FetchState::Failed(_))
    );
    match (skills, categories) {
        (FetchState::Loaded(skills), FetchState::Loaded(categories))
            if decision == SourceDecision::LiveOk =>
        {
            tracing::info!(
                "Using live catalog: {} skills, {} categories",
                skills.len(),
                categories.len()
            );
            ResolvedCatalog {
                skills: skills.into_iter().map(canonicalize_skill).collect(),
                categories: categories.into_iter().map(canonicalize_category).collect(),
                is_loading: false,
                is_from_database: true,
                is_error: false,
                decision,
            }
        }
        _ => {
            match &decision {
                SourceDecision::Fallback(reason) => {
                    tracing::warn!("Falling back to static dataset: {:?}", reason);
                }
                SourceDecision::Loading => {
                    tracing::debug!("Live catalog still loading, static dataset as placeholder");
                }
                SourceDecision::LiveOk => {}
            }
            ResolvedCatalog {
                skills: fallback.skills.clone(),
                categories: fallback.categories.clone(),
                is_loading: decision == SourceDecision::Loading,
                is_from_database: false,
                is_error,
                decision,
            }
        }
    }
}

/// 执行一次拉取，失败后最多再重试 `retries` 次
pub async fn fetch_with_retry<T, F, Fut>(
    label: &str,
    retries: u32,
    mut fetch: F,
) -> FetchState<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>, CatalogError>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(items) => return FetchState::Loaded(items),
            Err(e) if attempt < retries => {
                attempt += 1;
                tracing::debug!("{} fetch failed ({}), retry {}/{}", label, e, attempt, retries);
            }
            Err(e) => {
                tracing::warn!("{} fetch failed after {} attempts: {}", label, attempt + 1, e);
                return FetchState::Failed(e.to_string());
            }
        }
    }
}

/// 并发拉取实时数据并解析
pub struct CatalogResolver {
    source: Option<Arc<dyn CatalogSource>>,
    fallback: Arc<StaticDataset>,
    retries: u32,
}

impl CatalogResolver {
    /// `source` 为 None 表示没有实时数据源，始终回退
    pub fn new(source: Option<Arc<dyn CatalogSource>>, retries: u32) -> Self {
        Self {
            source,
            fallback: Arc::new(static_dataset().clone()),
            retries,
        }
    }

    /// 替换回退数据集
    pub fn with_fallback(mut self, fallback: StaticDataset) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    pub async fn resolve(&self) -> ResolvedCatalog {
        let (skills, categories) = match &self.source {
            Some(source) => {
                tokio::join!(
                    fetch_with_retry("skills", self.retries, || source.list_skills()),
                    fetch_with_retry("categories", self.retries, || source.list_categories()),
                )
            }
            None => (
                FetchState::Failed("live source not configured".to_string()),
                FetchState::Failed("live source not configured".to_string()),
            ),
        };
        resolve(skills, categories, &self.fallback)
    }
}
