use std::path::Path;

use super::*;

fn site(name: &str, prod: &[&str], stage: &[&str]) -> SiteVariant {
    SiteVariant {
        name: name.to_string(),
        sheet_name: name.to_uppercase(),
        report_title: format!("{name} report"),
        seo: true,
        prod_urls: prod.iter().map(|s| (*s).to_string()).collect(),
        stage_urls: stage.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[test]
fn pairs_zips_in_order() {
    let s = site(
        "main",
        &["https://a.example/1", "https://a.example/2"],
        &["https://b.example/1", "https://b.example/2"],
    );
    let pairs = s.pairs().unwrap();
    assert_eq!(
        pairs,
        vec![
            UrlPair::new("https://a.example/1", "https://b.example/1"),
            UrlPair::new("https://a.example/2", "https://b.example/2"),
        ]
    );
}

#[test]
fn pairs_rejects_length_mismatch() {
    let s = site(
        "main",
        &["https://a.example/1", "https://a.example/2"],
        &["https://b.example/1"],
    );
    let err = s.pairs().unwrap_err();
    assert!(
        matches!(
            err,
            ConfigError::PairCountMismatch { ref site, prod: 2, stage: 1 } if site == "main"
        ),
        "expected PairCountMismatch, got: {err:?}"
    );
}

#[test]
fn pairs_of_empty_lists_is_empty() {
    let s = site("main", &[], &[]);
    assert!(s.pairs().unwrap().is_empty());
}

#[test]
fn seo_defaults_to_enabled() {
    let yaml = r#"
sites:
  - name: main
    sheet_name: MAIN
    report_title: Main
    prod_urls: ["https://a.example/"]
    stage_urls: ["https://b.example/"]
"#;
    let file = parse_sites(yaml).unwrap();
    assert_eq!(file.sites[0].signal_groups(), SignalGroups::ALL);
}

#[test]
fn seo_can_be_disabled() {
    let yaml = r"
sites:
  - name: pol
    sheet_name: POL
    report_title: Pol
    seo: false
";
    let file = parse_sites(yaml).unwrap();
    assert_eq!(file.sites[0].signal_groups(), SignalGroups::HEADINGS_ONLY);
}

#[test]
fn validate_rejects_empty_site_list() {
    let err = parse_sites("sites: []").unwrap_err();
    assert!(err.to_string().contains("at least one site"));
}

#[test]
fn validate_rejects_duplicate_names_case_insensitively() {
    let file = SitesFile {
        sites: vec![site("Main", &[], &[]), site("main", &[], &[])],
    };
    let err = validate_sites(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate site name"));
}

#[test]
fn validate_rejects_blank_sheet_name() {
    let mut s = site("main", &[], &[]);
    s.sheet_name = "  ".to_string();
    let err = validate_sites(&SitesFile { sites: vec![s] }).unwrap_err();
    assert!(err.to_string().contains("empty sheet_name"));
}

#[test]
fn validate_rejects_relative_url() {
    let s = site("main", &["/about/"], &["https://b.example/about/"]);
    let err = validate_sites(&SitesFile { sites: vec![s] }).unwrap_err();
    assert!(err.to_string().contains("invalid URL"), "got: {err}");
}

#[test]
fn validate_rejects_non_http_scheme() {
    let s = site("main", &["ftp://a.example/"], &["https://b.example/"]);
    let err = validate_sites(&SitesFile { sites: vec![s] }).unwrap_err();
    assert!(err.to_string().contains("unsupported scheme"), "got: {err}");
}

#[test]
fn validate_allows_mismatched_lengths() {
    let s = site("main", &["https://a.example/"], &[]);
    assert!(validate_sites(&SitesFile { sites: vec![s] }).is_ok());
}

#[test]
fn find_is_case_insensitive() {
    let file = SitesFile {
        sites: vec![site("mol", &[], &[])],
    };
    assert_eq!(file.find("MOL").unwrap().name, "mol");
    assert!(matches!(
        file.find("pol"),
        Err(ConfigError::UnknownSite(ref n)) if n == "pol"
    ));
}

#[test]
fn load_sites_reports_missing_file() {
    let err = load_sites(Path::new("/definitely/not/here/sites.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SitesFileIo { .. }));
}

#[test]
fn load_sites_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("sites.yaml");
    assert!(
        path.exists(),
        "sites.yaml missing at {path:?}: required for this test"
    );
    let sites_file = load_sites(&path).expect("failed to load sites.yaml");
    assert!(!sites_file.sites.is_empty());
    for site in &sites_file.sites {
        let pairs = site
            .pairs()
            .unwrap_or_else(|e| panic!("site '{}' is out of sync: {e}", site.name));
        assert!(!pairs.is_empty(), "site '{}' has no pairs", site.name);
    }
}
