//! `run` command: check every pair of the selected site variants, then
//! publish one sheet and one chat message per variant.
//!
//! A failed fetch is part of the report, not a failure of the run. A failed
//! reporter is logged, the remaining reporters still run, and the command
//! exits non-zero at the end.

use std::path::Path;

use seodiff_core::{AppConfig, SiteVariant, SitesFile};
use seodiff_report::{
    sheet, write_json, ChatSummary, Delivery, ReportError, SheetsClient, SiteReport,
    TelegramNotifier,
};
use seodiff_scraper::{pair::now_stamp, FixedDelay, PairResult, PairRunner};

/// Sheet and chat sinks shared by every site of a run.
struct Reporters {
    sheets: Option<SheetsClient>,
    telegram: TelegramNotifier,
}

impl Reporters {
    fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let sheets = match SheetsClient::from_config(config) {
            Ok(client) => Some(client),
            Err(ReportError::MissingConfig(var)) => {
                tracing::warn!(var, "spreadsheet reporter disabled");
                None
            }
            Err(e) => return Err(anyhow::anyhow!("failed to build spreadsheet client: {e}")),
        };
        let telegram = TelegramNotifier::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to build Telegram client: {e}"))?;
        Ok(Self { sheets, telegram })
    }

    /// Publishes `results` for `site`. Returns how many reporters failed.
    async fn deliver(&self, site: &SiteVariant, results: &[PairResult]) -> usize {
        let groups = site.signal_groups();
        let mut failures = 0;

        if let Some(sheets) = &self.sheets {
            let table = sheet::table(results, groups);
            if let Err(e) = sheets.overwrite(&site.sheet_name, &table).await {
                tracing::error!(
                    site = %site.name,
                    sheet = %site.sheet_name,
                    error = %e,
                    "spreadsheet update failed"
                );
                failures += 1;
            }
        }

        let message = ChatSummary::from_results(results, groups)
            .render_html(&site.report_title, &now_stamp());
        match self.telegram.send_html(&message).await {
            Ok(Delivery::Sent | Delivery::Disabled) => {}
            Err(e) => {
                tracing::error!(site = %site.name, error = %e, "Telegram report failed");
                failures += 1;
            }
        }

        failures
    }
}

/// Pick the sites to run and check that each one pairs up.
///
/// Every selected site is checked before anything is fetched, so one bad list
/// stops the whole run up front.
fn plan<'a>(
    sites: &'a SitesFile,
    site_filter: Option<&str>,
) -> anyhow::Result<Vec<&'a SiteVariant>> {
    let selected: Vec<&SiteVariant> = match site_filter {
        Some(name) => vec![sites.find(name)?],
        None => sites.sites.iter().collect(),
    };

    for site in &selected {
        site.pairs()?;
    }
    Ok(selected)
}

/// Runs the selected site variants and reports each one.
///
/// # Errors
///
/// Returns an error on an unknown site name, a prod/stage length mismatch
/// (before any request), a JSON dump failure, or if any reporter failed.
pub(crate) async fn run_sites(
    config: &AppConfig,
    sites: &SitesFile,
    site_filter: Option<&str>,
    dry_run: bool,
    json: Option<&Path>,
) -> anyhow::Result<()> {
    let planned = plan(sites, site_filter)?;

    let reporters = if dry_run {
        None
    } else {
        Some(Reporters::from_config(config)?)
    };

    let client = crate::build_page_client(config)?;
    let runner = PairRunner::new(client, FixedDelay::from_millis(config.pair_delay_ms))
        .with_concurrent_sides(config.concurrent_sides);

    let mut completed: Vec<(&SiteVariant, Vec<PairResult>)> = Vec::with_capacity(planned.len());
    let mut failed_reporters = 0usize;

    for site in planned {
        let results = runner.run_site(site).await?;

        let summary = ChatSummary::from_results(&results, site.signal_groups());
        println!(
            "{}: {} pairs, {} with errors, {} with differences",
            site.name, summary.total, summary.error_count, summary.diff_count
        );

        match &reporters {
            Some(reporters) => failed_reporters += reporters.deliver(site, &results).await,
            None => println!("dry-run: skipped reporting for {}", site.name),
        }

        completed.push((site, results));
    }

    if let Some(path) = json {
        let reports: Vec<SiteReport<'_>> = completed
            .iter()
            .map(|(site, results)| SiteReport {
                site: &site.name,
                sheet_name: &site.sheet_name,
                seo: site.seo,
                results,
            })
            .collect();
        write_json(path, &reports)?;
        println!("results written to {}", path.display());
    }

    if failed_reporters > 0 {
        anyhow::bail!("{failed_reporters} report deliveries failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites(yaml: &str) -> SitesFile {
        seodiff_core::sites::parse_sites(yaml).expect("valid sites yaml")
    }

    const TWO_SITES: &str = r"
sites:
  - name: main
    sheet_name: MAIN
    report_title: MAIN SEO page inspector
    prod_urls:
      - https://example.com/a
      - https://example.com/b
    stage_urls:
      - https://stage.example.com/a
      - https://stage.example.com/b
  - name: pol
    sheet_name: POL
    report_title: POL page inspector
    seo: false
    prod_urls:
      - https://example.com/c
    stage_urls: []
";

    #[test]
    fn plan_rejects_any_mismatched_site_before_running() {
        let sites = sites(TWO_SITES);
        let err = plan(&sites, None).unwrap_err();
        assert!(err.to_string().contains("'pol'"), "{err}");
    }

    #[test]
    fn plan_with_filter_only_checks_selected_site() {
        let sites = sites(TWO_SITES);
        let planned = plan(&sites, Some("MAIN")).expect("main pairs up");
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].name, "main");
    }

    #[test]
    fn plan_with_unknown_site_fails() {
        let sites = sites(TWO_SITES);
        let err = plan(&sites, Some("nope")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
