//! SkillHub Web API
//!
//! 启动: cargo run --bin skillhub-web --features web
//! 健康检查 http://127.0.0.1:8080/api/health

#![cfg(feature = "web")]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use skillhub::catalog::CatalogResolver;
use skillhub::config::{load_config, SourceKind};
use skillhub::observability;
use skillhub::store::{create_catalog_source, create_catalog_store, store_as_source};
use skillhub::web::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "skillhub-web", version, about = "SkillHub HTTP API")]
struct Args {
    /// 额外配置文件（覆盖 config/default.toml）
    #[arg(short, long, env = "SKILLHUB_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// 默认日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 监听端口（覆盖 [server].port）
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    observability::init(&args.log_level);

    let cfg = load_config(args.config).context("Failed to load config")?;
    if cfg.admin.token.is_none() {
        tracing::warn!("[admin].token not set, write endpoints will reject every request");
    }

    let store = create_catalog_store(&cfg).await;
    // sqlite 模式下解析器与写接口共用同一连接池
    let source = match cfg.catalog.source {
        SourceKind::Sqlite => Some(store_as_source(store.clone())),
        _ => create_catalog_source(&cfg).await,
    };
    let resolver = CatalogResolver::new(source, cfg.catalog.fetch_retries);

    let host = cfg.server.host.clone();
    let port = args.port.unwrap_or(cfg.server.port);
    let state = Arc::new(AppState {
        config: cfg,
        store,
        resolver,
    });
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("SkillHub Web API: http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
