//! Local JSON dump of run results.

use std::path::Path;

use serde::Serialize;

use seodiff_scraper::PairResult;

use crate::error::ReportError;

/// Results of one site variant as written by [`write_json`].
#[derive(Debug, Serialize)]
pub struct SiteReport<'a> {
    pub site: &'a str,
    pub sheet_name: &'a str,
    pub seo: bool,
    pub results: &'a [PairResult],
}

/// Writes `reports` to `path` as pretty-printed JSON, replacing the file.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if serialization fails or
/// [`ReportError::Io`] if the file cannot be written.
pub fn write_json(path: &Path, reports: &[SiteReport<'_>]) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json).map_err(|e| ReportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), sites = reports.len(), "results written");
    Ok(())
}
