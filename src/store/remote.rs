//! 远程只读数据源：向运行中的 skillhub-web 拉取 /api/categories 与 /api/skills

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::records::{CategoryRecord, SkillRecord};
use super::CatalogSource;
use crate::config::RemoteSection;
use crate::error::{CatalogError, Result};

pub struct RemoteCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteCatalogSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(section: &RemoteSection) -> Result<Self> {
        Self::new(
            section.base_url.clone(),
            Duration::from_secs(section.timeout_secs),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::RemoteStatus(status.as_u16(), body));
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalogSource {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.get_json("/api/categories").await
    }

    async fn list_skills(&self) -> Result<Vec<SkillRecord>> {
        self.get_json("/api/skills").await
    }
}
