//! Live valuation reads and snapshot writes.
//!
//! Every read loads the portfolio and its holdings, then hands them to the
//! pure functions in `fingenius_core::valuation`. Nothing here writes except
//! [`ValuationService::record_snapshot`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use fingenius_core::portfolio::{Holding, Portfolio};
use fingenius_core::valuation::{
    self, AllocationDimension, CashPolicy, PortfolioValuation, ValuationSnapshot,
};
use fingenius_core::PortfolioId;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::store::PortfolioStore;

/// Outcome of one pass over all active portfolios
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotReport {
    pub recorded: usize,
    pub conflicts: usize,
    pub failed: usize,
}

pub struct ValuationService {
    store: Arc<dyn PortfolioStore>,
    policy: Arc<dyn CashPolicy>,
}

impl ValuationService {
    pub fn new(store: Arc<dyn PortfolioStore>, policy: Arc<dyn CashPolicy>) -> Self {
        Self { store, policy }
    }

    async fn load(&self, id: PortfolioId) -> Result<(Portfolio, Vec<Holding>)> {
        let portfolio = self.store.load_portfolio(id).await?;
        let holdings = self.store.load_holdings(id).await?;
        Ok((portfolio, holdings))
    }

    pub async fn total_value(&self, id: PortfolioId) -> Result<Decimal> {
        let (portfolio, holdings) = self.load(id).await?;
        Ok(valuation::total_portfolio_value(
            &portfolio,
            &holdings,
            self.policy.as_ref(),
        )?)
    }

    pub async fn valuation(&self, id: PortfolioId) -> Result<PortfolioValuation> {
        let (portfolio, holdings) = self.load(id).await?;
        Ok(valuation::value_portfolio(
            &portfolio,
            &holdings,
            self.policy.as_ref(),
        )?)
    }

    pub async fn allocation_percentage(&self, id: PortfolioId, asset_type: &str) -> Result<Decimal> {
        let (portfolio, holdings) = self.load(id).await?;
        Ok(valuation::allocation_percentage(
            &portfolio,
            &holdings,
            self.policy.as_ref(),
            asset_type,
        )?)
    }

    pub async fn allocation_breakdown(
        &self,
        id: PortfolioId,
        dimension: AllocationDimension,
    ) -> Result<BTreeMap<String, Decimal>> {
        let (portfolio, holdings) = self.load(id).await?;
        Ok(valuation::allocation_breakdown(
            &portfolio,
            &holdings,
            self.policy.as_ref(),
            dimension,
        )?)
    }

    /// Recompute the live total and persist it as the portfolio's stored total.
    ///
    /// Fails with `SnapshotConflict` when the portfolio version moved between
    /// the read and the write.
    pub async fn record_snapshot(&self, id: PortfolioId) -> Result<ValuationSnapshot> {
        let (portfolio, holdings) = self.load(id).await?;
        let snapshot =
            valuation::snapshot(&portfolio, &holdings, self.policy.as_ref(), Utc::now())?;
        let version = self.store.write_snapshot(&snapshot).await?;
        info!(
            portfolio_id = id,
            total_value = %snapshot.total_value,
            version,
            "Recorded valuation snapshot"
        );
        Ok(snapshot)
    }

    /// Snapshot every active portfolio, continuing past individual failures
    pub async fn snapshot_all(&self) -> Result<SnapshotReport> {
        let ids = self.store.active_portfolio_ids().await?;
        let mut report = SnapshotReport::default();

        for id in ids {
            match self.record_snapshot(id).await {
                Ok(_) => report.recorded += 1,
                Err(Error::SnapshotConflict(_)) => {
                    warn!(portfolio_id = id, "Snapshot skipped: portfolio changed concurrently");
                    report.conflicts += 1;
                }
                Err(e) => {
                    error!(portfolio_id = id, error = %e, "Snapshot failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            recorded = report.recorded,
            conflicts = report.conflicts,
            failed = report.failed,
            "Snapshot pass finished"
        );
        Ok(report)
    }
}
