use crate::errors::*;
use crate::model::{self, CveDetailsWithContext, RawSummary, VulnerabilitySummary, VulnerableField};
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;

pub const DEFAULT_URL: &str =
    "https://glvd.ingress.glvd.gardnlinux.shoot.canary.k8s-hana.ondemand.com";

/// The three read-only queries the service answers.
#[async_trait]
pub trait Glvd {
    async fn fetch_versions(&self) -> Result<Vec<String>>;

    async fn fetch_summaries(&self, version: &str) -> Result<Vec<VulnerabilitySummary>>;

    async fn fetch_detail(&self, cve_id: &str) -> Result<CveDetailsWithContext>;
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    vulnerable_field: VulnerableField,
}

impl Client {
    pub fn new(base_url: &str, vulnerable_field: VulnerableField) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("glvdctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to setup http client")?;

        Ok(Client {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            vulnerable_field,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        info!("Url={}", url);

        let body = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| anyhow!("Failed to fetch {:?}", url))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| anyhow!("Failed to read response from {:?}", url))?;

        let json = serde_json::from_slice(&body)
            .with_context(|| anyhow!("Failed to decode response from {:?}", url))?;
        Ok(json)
    }
}

#[async_trait]
impl Glvd for Client {
    async fn fetch_versions(&self) -> Result<Vec<String>> {
        let versions: Vec<String> = self.get("gardenlinuxVersions").await?;
        debug!("Received {} versions", versions.len());
        Ok(versions)
    }

    async fn fetch_summaries(&self, version: &str) -> Result<Vec<VulnerabilitySummary>> {
        let raw: Vec<RawSummary> = self.get(&format!("cves/{}", version)).await?;
        debug!(
            "Received {} cves for {:?}, reading the {} field",
            raw.len(),
            version,
            self.vulnerable_field
        );
        Ok(model::resolve_summaries(raw, self.vulnerable_field))
    }

    async fn fetch_detail(&self, cve_id: &str) -> Result<CveDetailsWithContext> {
        let detail: CveDetailsWithContext = self.get(&format!("cveDetails/{}", cve_id)).await?;
        debug!("Received {} contexts for {:?}", detail.contexts.len(), cve_id);
        Ok(detail)
    }
}

/// Check the shape of a CVE id and normalize it to upper case.
pub fn parse_cve_id(s: &str) -> Result<String> {
    let re = Regex::new(r"(?i)^CVE-\d{4}-\d{4,}$")?;
    let s = s.trim();
    if !re.is_match(s) {
        bail!("Invalid CVE id, expected CVE-YYYY-NNNN: {:?}", s);
    }
    Ok(s.to_uppercase())
}
