use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("sprig/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("http client")
});

#[derive(Debug, Clone)]
pub struct Fetcher {
    registry: String,
}

impl Fetcher {
    pub fn new(registry: Option<String>) -> Self {
        Self { registry: registry.unwrap_or_else(|| DEFAULT_REGISTRY.into()) }
    }

    /// One round-trip per call; resolution always sees fresh metadata.
    pub fn package_metadata(&self, name: &str) -> Result<RegistryMetadata> {
        let url = format!("{}/{}", self.registry.trim_end_matches('/'), name);
        let resp = CLIENT
            .get(&url)
            .send()
            .map_err(|source| Error::Http { url: url.clone(), source })?;
        if !resp.status().is_success() {
            return Err(Error::Status { url, status: resp.status() });
        }
        resp.json()
            .map_err(|source| Error::Metadata { name: name.to_string(), source })
    }

    /// Open a tarball response for streaming extraction.
    pub fn open_tarball(&self, url: &str) -> Result<Response> {
        let resp = CLIENT
            .get(url)
            .send()
            .map_err(|source| Error::Http { url: url.to_string(), source })?;
        if !resp.status().is_success() {
            return Err(Error::Status { url: url.to_string(), status: resp.status() });
        }
        Ok(resp)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegistryMetadata {
    #[serde(default, rename = "dist-tags")]
    pub dist_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub versions: BTreeMap<String, VersionMetadata>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VersionMetadata {
    pub dist: DistInfo,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DistInfo {
    pub tarball: String,
}

impl RegistryMetadata {
    pub fn tarball_url(&self, version: &str) -> Result<&str> {
        self.versions
            .get(version)
            .map(|v| v.dist.tarball.as_str())
            .ok_or_else(|| Error::VersionNotFound { version: version.to_string() })
    }

    pub fn dependencies_of(&self, version: &str) -> Option<&BTreeMap<String, String>> {
        self.versions.get(version).map(|v| &v.dependencies)
    }
}
