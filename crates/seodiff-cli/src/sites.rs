//! `sites` command: list configured variants.

use seodiff_core::SitesFile;

pub(crate) fn list_sites(sites: &SitesFile) -> anyhow::Result<()> {
    let (listing, mismatched) = render_sites(sites);
    print!("{listing}");
    if mismatched > 0 {
        anyhow::bail!("{mismatched} site(s) have prod/stage lists of different length");
    }
    Ok(())
}

/// Returns the listing and the number of sites whose lists do not pair up.
fn render_sites(sites: &SitesFile) -> (String, usize) {
    let mut out = String::new();
    let mut mismatched = 0;

    for site in &sites.sites {
        let groups = if site.seo { "headings+seo" } else { "headings" };
        let pairs = match site.pairs() {
            Ok(pairs) => format!("{} pairs", pairs.len()),
            Err(e) => {
                mismatched += 1;
                format!("MISMATCH ({e})")
            }
        };
        out.push_str(&format!(
            "{:<12} sheet={:<10} {:<13} {pairs}\n",
            site.name, site.sheet_name, groups
        ));
    }

    (out, mismatched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_pair_counts_and_flags_mismatches() {
        let sites = seodiff_core::sites::parse_sites(
            r"
sites:
  - name: main
    sheet_name: MAIN
    report_title: MAIN
    prod_urls:
      - https://example.com/
    stage_urls:
      - https://stage.example.com/
  - name: pol
    sheet_name: POL
    report_title: POL
    seo: false
    prod_urls:
      - https://example.com/
    stage_urls: []
",
        )
        .expect("valid sites yaml");

        let (out, mismatched) = render_sites(&sites);
        assert_eq!(mismatched, 1);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("main"));
        assert!(lines[0].contains("headings+seo"));
        assert!(lines[0].ends_with("1 pairs"));
        assert!(lines[1].contains("MISMATCH"));
    }

    #[test]
    fn bundled_sites_file_pairs_up() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/sites.yaml");
        let sites = seodiff_core::load_sites(&path).expect("bundled sites.yaml loads");
        let (_, mismatched) = render_sites(&sites);
        assert_eq!(mismatched, 0);
    }
}
