use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use strum::Display;

/// Which JSON field carries the vulnerability flag of a summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, ValueEnum)]
#[strum(serialize_all = "camelCase")]
pub enum VulnerableField {
    /// `vulnerable`
    #[default]
    Vulnerable,
    /// `isVulnerable`
    IsVulnerable,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct VulnerabilitySummary {
    pub cve_id: String,
    pub base_score: f64,
    pub vector_string: String,
    pub source_package_name: String,
    pub source_package_version: String,
    pub distribution_version: String,
    pub is_vulnerable: bool,
    pub published_date: String,
}

/// Wire form of a summary, both spellings of the vulnerability flag are kept
/// until the configured one is picked.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSummary {
    #[serde(deserialize_with = "nullable")]
    pub cve_id: String,
    #[serde(deserialize_with = "nullable")]
    pub base_score: f64,
    #[serde(deserialize_with = "nullable")]
    pub vector_string: String,
    #[serde(deserialize_with = "nullable")]
    pub source_package_name: String,
    #[serde(deserialize_with = "nullable")]
    pub source_package_version: String,
    #[serde(
        rename = "gardenlinuxVersion",
        alias = "distributionVersion",
        deserialize_with = "nullable"
    )]
    pub distribution_version: String,
    pub vulnerable: Option<bool>,
    pub is_vulnerable: Option<bool>,
    #[serde(
        rename = "cvePublishedDate",
        alias = "publishedDate",
        deserialize_with = "nullable"
    )]
    pub published_date: String,
}

impl RawSummary {
    pub fn resolve(self, field: VulnerableField) -> VulnerabilitySummary {
        let flag = match field {
            VulnerableField::Vulnerable => self.vulnerable,
            VulnerableField::IsVulnerable => self.is_vulnerable,
        };

        VulnerabilitySummary {
            cve_id: self.cve_id,
            base_score: self.base_score,
            vector_string: self.vector_string,
            source_package_name: self.source_package_name,
            source_package_version: self.source_package_version,
            distribution_version: self.distribution_version,
            is_vulnerable: flag.unwrap_or(false),
            published_date: self.published_date,
        }
    }
}

pub fn resolve_summaries(
    raw: Vec<RawSummary>,
    field: VulnerableField,
) -> Vec<VulnerabilitySummary> {
    raw.into_iter().map(|s| s.resolve(field)).collect()
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CveDetail {
    #[serde(deserialize_with = "nullable")]
    pub cve_id: String,
    #[serde(deserialize_with = "nullable")]
    pub vuln_status: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub cve_published_date: String,
    #[serde(deserialize_with = "nullable")]
    pub cve_modified_date: String,
    #[serde(deserialize_with = "nullable")]
    pub cve_ingested_date: String,

    #[serde(deserialize_with = "nullable_items")]
    pub kernel_lts_version: Vec<String>,
    #[serde(deserialize_with = "nullable_items")]
    pub kernel_fixed_version: Vec<String>,
    #[serde(deserialize_with = "nullable_items")]
    pub kernel_is_fixed: Vec<bool>,
    #[serde(deserialize_with = "nullable_items")]
    pub kernel_is_relevant_subsystem: Vec<bool>,

    #[serde(deserialize_with = "nullable_items")]
    pub distro: Vec<String>,
    #[serde(deserialize_with = "nullable_items")]
    pub distro_version: Vec<String>,
    #[serde(deserialize_with = "nullable_items")]
    pub is_vulnerable: Vec<bool>,
    #[serde(deserialize_with = "nullable_items")]
    pub source_package_name: Vec<String>,
    #[serde(deserialize_with = "nullable_items")]
    pub source_package_version: Vec<String>,
    #[serde(deserialize_with = "nullable_items")]
    pub version_fixed: Vec<String>,

    #[serde(rename = "baseScoreV40", deserialize_with = "nullable")]
    pub base_score_v40: f64,
    #[serde(rename = "baseScoreV31", deserialize_with = "nullable")]
    pub base_score_v31: f64,
    #[serde(rename = "baseScoreV30", deserialize_with = "nullable")]
    pub base_score_v30: f64,
    #[serde(rename = "baseScoreV2", deserialize_with = "nullable")]
    pub base_score_v2: f64,
    #[serde(rename = "vectorStringV40", deserialize_with = "nullable")]
    pub vector_string_v40: String,
    #[serde(rename = "vectorStringV31", deserialize_with = "nullable")]
    pub vector_string_v31: String,
    #[serde(rename = "vectorStringV30", deserialize_with = "nullable")]
    pub vector_string_v30: String,
    #[serde(rename = "vectorStringV2", deserialize_with = "nullable")]
    pub vector_string_v2: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CveContext {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub cve_id: String,
    #[serde(rename = "distId", alias = "distributionId", deserialize_with = "nullable")]
    pub distribution_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub create_date: String,
    #[serde(deserialize_with = "nullable")]
    pub use_case: String,
    #[serde(deserialize_with = "nullable")]
    pub score_override: f64,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub resolved: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CveDetailsWithContext {
    #[serde(deserialize_with = "nullable")]
    pub details: CveDetail,
    #[serde(deserialize_with = "nullable")]
    pub contexts: Vec<CveContext>,
}

/// The service sends `null` for unset values, read them as the zero value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like `nullable`, also for the elements of the list.
fn nullable_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}
