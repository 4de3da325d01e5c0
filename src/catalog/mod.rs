//! 技能目录：实体模型、内置数据集、数据源解析、过滤与展示投影

pub mod filter;
pub mod model;
pub mod resolver;
pub mod static_data;
pub mod view;

pub use filter::{filter_skills, matches_query, normalize_query, CategorySelection, ALL_CATEGORIES};
pub use model::{Category, Language, Localized, Skill, SkillSource};
pub use resolver::{
    canonicalize_category, canonicalize_skill, decide, resolve, CatalogResolver, FallbackReason,
    FetchState, ResolvedCatalog, SourceDecision,
};
pub use static_data::{static_dataset, StaticDataset};
pub use view::{CatalogView, CategoryChip, CategoryHeader, SkillCard};
