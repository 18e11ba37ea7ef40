//! `check` command: extract and print the signals of one URL.

use seodiff_core::{AppConfig, SignalGroups};
use seodiff_scraper::{PageSignals, HEADING_LEVELS};

pub(crate) async fn check_url(
    config: &AppConfig,
    url: &str,
    headings_only: bool,
) -> anyhow::Result<()> {
    let groups = if headings_only {
        SignalGroups::HEADINGS_ONLY
    } else {
        SignalGroups::ALL
    };

    let client = crate::build_page_client(config)?;
    let record = client.extract(url, groups).await;

    match (&record.signals, &record.error) {
        (Some(signals), _) => {
            print!("{}", render_signals(url, signals));
            Ok(())
        }
        (None, Some(error)) => anyhow::bail!("failed to check {url}: {error}"),
        (None, None) => anyhow::bail!("failed to check {url}"),
    }
}

fn render_signals(url: &str, signals: &PageSignals) -> String {
    let mut out = format!("{url}\n");
    for level in HEADING_LEVELS {
        let count = signals.headings.level(level);
        out.push_str(&format!(
            "  h{level}: {} non-empty / {} total\n",
            count.non_empty, count.total
        ));
    }
    out.push_str(&format!(
        "  headings: {} non-empty / {} total\n",
        signals.headings.total_non_empty(),
        signals.headings.total_all()
    ));
    if let Some(seo) = &signals.seo {
        out.push_str(&format!(
            "  title: {} non-empty / {} total\n",
            seo.title_non_empty, seo.title_total
        ));
        out.push_str(&format!(
            "  description: {} non-empty / {} total\n",
            seo.description_non_empty, seo.description_total
        ));
    }
    out
}
