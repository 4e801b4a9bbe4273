pub mod competitive;
pub mod contribution;
pub mod cuisine;
pub mod locality;
pub mod market;
pub mod opportunity;
pub mod rank;
pub mod service;
pub mod success;

#[cfg(test)]
pub(crate) mod testing;

use common::Result;
use common::config::AnalysisConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::processor::silver::Snapshot;
pub use competitive::CompetitiveRanking;
pub use contribution::LocalityContribution;
pub use cuisine::CuisinePerformance;
pub use locality::LocalityPerformance;
pub use market::MarketPenetration;
pub use opportunity::Opportunity;
pub use service::ServiceCorrelation;
pub use success::SuccessScore;

/// Rows of one view plus how many records it had to leave out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewOutput<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewCount {
    pub view: &'static str,
    pub rows: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldViews {
    pub market_penetration: ViewOutput<MarketPenetration>,
    pub locality_performance: ViewOutput<LocalityPerformance>,
    pub cuisine_performance: ViewOutput<CuisinePerformance>,
    pub service_correlation: ViewOutput<ServiceCorrelation>,
    pub rolling_contribution: ViewOutput<LocalityContribution>,
    pub competitive_ranking: ViewOutput<CompetitiveRanking>,
    pub opportunity_scoring: ViewOutput<Opportunity>,
    pub success_scoring: ViewOutput<SuccessScore>,
}

impl GoldViews {
    pub fn counts(&self) -> Vec<ViewCount> {
        fn count<T>(view: &'static str, output: &ViewOutput<T>) -> ViewCount {
            ViewCount {
                view,
                rows: output.rows.len(),
                dropped: output.dropped,
            }
        }

        vec![
            count("market_penetration", &self.market_penetration),
            count("locality_performance", &self.locality_performance),
            count("cuisine_performance", &self.cuisine_performance),
            count("service_correlation", &self.service_correlation),
            count("rolling_contribution", &self.rolling_contribution),
            count("competitive_ranking", &self.competitive_ranking),
            count("opportunity_scoring", &self.opportunity_scoring),
            count("success_scoring", &self.success_scoring),
        ]
    }
}

/// Third layer: the analytical views.
pub struct GoldProcessor {
    config: AnalysisConfig,
}

impl GoldProcessor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self { config: *config }
    }

    pub fn compute_sequential(&self, snapshot: &Snapshot) -> GoldViews {
        let c = &self.config;
        GoldViews {
            market_penetration: market::market_penetration(snapshot),
            locality_performance: locality::locality_performance(snapshot, c.locality_min_restaurants),
            cuisine_performance: cuisine::cuisine_performance(
                snapshot,
                c.cuisine_min_restaurants,
                c.cuisine_min_token_len,
            ),
            service_correlation: service::service_correlation(snapshot),
            rolling_contribution: contribution::rolling_contribution(snapshot),
            competitive_ranking: competitive::competitive_ranking(snapshot, c.competitive_min_votes),
            opportunity_scoring: opportunity::opportunity_scoring(snapshot),
            success_scoring: success::success_scoring(snapshot),
        }
    }

    /// Computes every view, each on the blocking pool when `parallel_views`
    /// is set. The result is the same either way.
    pub async fn compute(&self, snapshot: Arc<Snapshot>) -> Result<GoldViews> {
        let views = if self.config.parallel_views {
            self.compute_parallel(snapshot).await?
        } else {
            self.compute_sequential(&snapshot)
        };

        for count in views.counts() {
            info!(view = count.view, rows = count.rows, dropped = count.dropped, "Gold view computed");
        }
        Ok(views)
    }

    async fn compute_parallel(&self, snapshot: Arc<Snapshot>) -> Result<GoldViews> {
        let c = self.config;

        let (
            market_penetration,
            locality_performance,
            cuisine_performance,
            service_correlation,
            rolling_contribution,
            competitive_ranking,
            opportunity_scoring,
            success_scoring,
        ) = tokio::try_join!(
            spawn_view(&snapshot, market::market_penetration),
            spawn_view(&snapshot, move |s| locality::locality_performance(s, c.locality_min_restaurants)),
            spawn_view(&snapshot, move |s| {
                cuisine::cuisine_performance(s, c.cuisine_min_restaurants, c.cuisine_min_token_len)
            }),
            spawn_view(&snapshot, service::service_correlation),
            spawn_view(&snapshot, contribution::rolling_contribution),
            spawn_view(&snapshot, move |s| competitive::competitive_ranking(s, c.competitive_min_votes)),
            spawn_view(&snapshot, opportunity::opportunity_scoring),
            spawn_view(&snapshot, success::success_scoring),
        )?;

        Ok(GoldViews {
            market_penetration,
            locality_performance,
            cuisine_performance,
            service_correlation,
            rolling_contribution,
            competitive_ranking,
            opportunity_scoring,
            success_scoring,
        })
    }
}

fn spawn_view<T, F>(snapshot: &Arc<Snapshot>, view: F) -> tokio::task::JoinHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&Snapshot) -> T + Send + 'static,
{
    let snapshot = Arc::clone(snapshot);
    tokio::task::spawn_blocking(move || view(&snapshot))
}
