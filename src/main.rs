//! SkillHub 命令行
//!
//! 入口：解析参数、初始化日志、加载配置，然后执行子命令。

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use skillhub::catalog::{CatalogResolver, CatalogView, CategorySelection, Language, SkillCard};
use skillhub::config::{load_config, AppConfig};
use skillhub::i18n::t;
use skillhub::observability;
use skillhub::store::{
    create_catalog_source, seed_catalog, Caller, CatalogStore, SeedPayload, SqliteCatalogStore,
};

#[derive(Parser)]
#[command(name = "skillhub", version, about = "SkillHub - bilingual skill catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 额外配置文件（覆盖 config/default.toml）
    #[arg(long, global = true, env = "SKILLHUB_CONFIG")]
    config: Option<PathBuf>,

    /// 默认日志级别（RUST_LOG 优先）
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 按分类与关键字列出技能
    List {
        /// 分类 id，或 all
        #[arg(short, long, default_value = "all")]
        category: String,
        /// 检索关键字（名称、描述、场景、标签、作者，中英文均可）
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        lang: Option<Language>,
        /// 以 JSON 输出
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// 列出分类
    Categories {
        #[arg(short, long)]
        lang: Option<Language>,
    },
    /// 查看单个技能
    Show {
        id: String,
        #[arg(short, long)]
        lang: Option<Language>,
    },
    /// 把内置数据集导入 SQLite（需要管理令牌）
    Seed {
        #[arg(long, env = "SKILLHUB_ADMIN_TOKEN")]
        token: String,
    },
    /// 删除技能（需要管理令牌）
    Delete {
        id: String,
        #[arg(long, env = "SKILLHUB_ADMIN_TOKEN")]
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    observability::init(&cli.log_level);

    let cfg = load_config(cli.config).context("Failed to load config")?;

    match cli.command {
        Commands::List {
            category,
            query,
            lang,
            json,
        } => {
            let lang = lang.unwrap_or(cfg.app.default_language);
            let resolver = resolver(&cfg).await;
            let resolved = resolver.resolve().await;
            let selection = CategorySelection::parse(&category);
            let view = CatalogView::build(&resolved, lang, &selection, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", view.render_text());
            }
        }
        Commands::Categories { lang } => {
            let lang = lang.unwrap_or(cfg.app.default_language);
            let resolved = resolver(&cfg).await.resolve().await;
            println!("{:<16} {}", "all", t(lang, "filter.all"));
            for c in &resolved.categories {
                println!("{:<16} {}", c.id, c.name.get_or_en(lang));
            }
        }
        Commands::Show { id, lang } => {
            let lang = lang.unwrap_or(cfg.app.default_language);
            let resolved = resolver(&cfg).await.resolve().await;
            let Some(skill) = resolved.skill(&id) else {
                bail!("skill not found: {}", id);
            };
            let card = SkillCard::from_skill(skill, lang);
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        Commands::Seed { token } => {
            let store = open_store(&cfg).await?;
            let caller = Caller::from_token(Some(&token), cfg.admin.token.as_deref());
            let payload = SeedPayload::from_static(skillhub::catalog::static_dataset());
            let report = seed_catalog(&store, caller, &payload)
                .await
                .context("Seed failed")?;
            println!(
                "Seeded {} categories, {} skills into {:?}",
                report.categories_count, report.skills_count, cfg.database.path
            );
            store.close().await;
        }
        Commands::Delete { id, token } => {
            Caller::from_token(Some(&token), cfg.admin.token.as_deref()).require_admin()?;
            let store = open_store(&cfg).await?;
            let existed = store.delete_skill(&id).await?;
            store.close().await;
            if !existed {
                bail!("skill not found: {}", id);
            }
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

async fn resolver(cfg: &AppConfig) -> CatalogResolver {
    let source = create_catalog_source(cfg).await;
    CatalogResolver::new(source, cfg.catalog.fetch_retries)
}

async fn open_store(cfg: &AppConfig) -> anyhow::Result<SqliteCatalogStore> {
    SqliteCatalogStore::open(&cfg.database.path, cfg.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {:?}", cfg.database.path))
}
