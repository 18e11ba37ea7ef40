//! Sequential prod/stage pair runner.

use seodiff_core::{ConfigError, SignalGroups, SiteVariant, UrlPair};

use crate::client::PageClient;
use crate::pair::{now_stamp, PairResult};
use crate::rate_limit::Pacer;
use crate::types::SignalRecord;

/// Runs every pair of a site through extract → compare → assemble.
///
/// Pairs are processed one at a time in list order and the pacer runs after
/// each completed pair. With `concurrent_sides` the prod and stage fetches of
/// a single pair overlap; pair order and pacing are unchanged.
pub struct PairRunner<P: Pacer> {
    client: PageClient,
    pacer: P,
    concurrent_sides: bool,
}

impl<P: Pacer> PairRunner<P> {
    pub fn new(client: PageClient, pacer: P) -> Self {
        Self {
            client,
            pacer,
            concurrent_sides: false,
        }
    }

    #[must_use]
    pub fn with_concurrent_sides(mut self, concurrent_sides: bool) -> Self {
        self.concurrent_sides = concurrent_sides;
        self
    }

    /// Runs all pairs of `site`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PairCountMismatch`] before issuing any request
    /// if the site's prod and stage lists differ in length.
    pub async fn run_site(&self, site: &SiteVariant) -> Result<Vec<PairResult>, ConfigError> {
        let pairs = site.pairs()?;
        tracing::info!(site = %site.name, pairs = pairs.len(), seo = site.seo, "starting site run");
        Ok(self.run(&pairs, site.signal_groups()).await)
    }

    /// Runs `pairs` in order. Per-URL failures are recorded in the results,
    /// never returned.
    pub async fn run(&self, pairs: &[UrlPair], groups: SignalGroups) -> Vec<PairResult> {
        let mut results = Vec::with_capacity(pairs.len());

        for (index, pair) in pairs.iter().enumerate() {
            tracing::info!(
                pair = index + 1,
                of = pairs.len(),
                prod = %pair.prod_url,
                stage = %pair.stage_url,
                "checking pair"
            );

            let (prod, stage) = self.extract_pair(pair, groups).await;
            let result = PairResult::assemble(pair, &prod, &stage, groups, now_stamp());

            if result.diffs.has_any() {
                tracing::warn!(
                    prod = %pair.prod_url,
                    stage = %pair.stage_url,
                    total_diff = result.diffs.total,
                    "pair differs"
                );
            }

            results.push(result);
            self.pacer.pace().await;
        }

        results
    }

    async fn extract_pair(
        &self,
        pair: &UrlPair,
        groups: SignalGroups,
    ) -> (SignalRecord, SignalRecord) {
        if self.concurrent_sides {
            tokio::join!(
                self.client.extract(&pair.prod_url, groups),
                self.client.extract(&pair.stage_url, groups)
            )
        } else {
            let prod = self.client.extract(&pair.prod_url, groups).await;
            let stage = self.client.extract(&pair.stage_url, groups).await;
            (prod, stage)
        }
    }
}
