//! Site variant configuration: which prod/stage page pairs to compare, where
//! the results go, and which signal groups to collect.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Optional signal groups collected on top of heading counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGroups {
    /// `<title>` and meta-description counts.
    pub seo: bool,
}

impl SignalGroups {
    pub const HEADINGS_ONLY: Self = Self { seo: false };
    pub const ALL: Self = Self { seo: true };
}

impl Default for SignalGroups {
    fn default() -> Self {
        Self::ALL
    }
}

fn default_seo() -> bool {
    true
}

/// One production/staging site pair with its reporting targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteVariant {
    pub name: String,
    /// Spreadsheet tab the results overwrite.
    pub sheet_name: String,
    /// Headline of the chat report.
    pub report_title: String,
    #[serde(default = "default_seo")]
    pub seo: bool,
    #[serde(default)]
    pub prod_urls: Vec<String>,
    #[serde(default)]
    pub stage_urls: Vec<String>,
}

/// A production URL and the staging URL that renders the same logical page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPair {
    pub prod_url: String,
    pub stage_url: String,
}

impl UrlPair {
    pub fn new(prod_url: impl Into<String>, stage_url: impl Into<String>) -> Self {
        Self {
            prod_url: prod_url.into(),
            stage_url: stage_url.into(),
        }
    }
}

impl SiteVariant {
    #[must_use]
    pub fn signal_groups(&self) -> SignalGroups {
        SignalGroups { seo: self.seo }
    }

    /// Zip the prod and stage lists into ordered pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PairCountMismatch`] when the lists differ in
    /// length. Nothing is truncated: a mismatch means the lists are out of sync
    /// and every pair after the gap would compare the wrong pages.
    pub fn pairs(&self) -> Result<Vec<UrlPair>, ConfigError> {
        pair_urls(&self.name, &self.prod_urls, &self.stage_urls)
    }
}

/// Zip two URL lists into pairs, failing if their lengths differ.
///
/// # Errors
///
/// Returns [`ConfigError::PairCountMismatch`] on a length mismatch.
pub fn pair_urls(
    site: &str,
    prod_urls: &[String],
    stage_urls: &[String],
) -> Result<Vec<UrlPair>, ConfigError> {
    if prod_urls.len() != stage_urls.len() {
        return Err(ConfigError::PairCountMismatch {
            site: site.to_string(),
            prod: prod_urls.len(),
            stage: stage_urls.len(),
        });
    }
    Ok(prod_urls
        .iter()
        .zip(stage_urls)
        .map(|(prod, stage)| UrlPair::new(prod.clone(), stage.clone()))
        .collect())
}

#[derive(Debug, Deserialize)]
pub struct SitesFile {
    pub sites: Vec<SiteVariant>,
}

impl SitesFile {
    /// Look up a site by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSite`] if no site has that name.
    pub fn find(&self, name: &str) -> Result<&SiteVariant, ConfigError> {
        self.sites
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownSite(name.to_string()))
    }
}

/// Load and validate the site variants from a YAML file.
///
/// Pair-count mismatches are NOT rejected here; they are reported per site
/// by [`SiteVariant::pairs`] so the `sites` listing can still show them.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sites(&content)
}

/// Parse and validate site variants from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sites(content: &str) -> Result<SitesFile, ConfigError> {
    let sites_file: SitesFile = serde_yaml::from_str(content)?;
    validate_sites(&sites_file)?;
    Ok(sites_file)
}

fn validate_sites(sites_file: &SitesFile) -> Result<(), ConfigError> {
    if sites_file.sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one site must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for site in &sites_file.sites {
        if site.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(site.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name: '{}'",
                site.name
            )));
        }

        if site.sheet_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "site '{}' has an empty sheet_name",
                site.name
            )));
        }

        for url in site.prod_urls.iter().chain(&site.stage_urls) {
            validate_url(&site.name, url)?;
        }
    }

    Ok(())
}

fn validate_url(site: &str, url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| {
        ConfigError::Validation(format!("site '{site}' has invalid URL \"{url}\": {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "site '{site}' has URL \"{url}\" with unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
