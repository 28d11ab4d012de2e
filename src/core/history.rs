use serde::{Deserialize, Serialize};
use tracing::debug;

use super::headline::calculate_headline_metrics;
use super::scenarios::active_assumptions;
use super::tables::{
    calculate_cashflow_table, calculate_minimum_income_table, calculate_scenario_cost_table,
};
use super::types::{
    AssumptionSet, CashflowTableRow, HeadlineMetrics, HouseholdConfig, HouseholdSnapshot,
    MinimumIncomeRow, ScenarioCostTableRow,
};

pub const MAX_HISTORY_MONTHS: usize = 36;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Added,
    Updated,
}

/// Monthly snapshots, newest first, one per calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotHistory {
    snapshots: Vec<HouseholdSnapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = HouseholdSnapshot>) -> Self {
        let mut history = Self::new();
        for snapshot in snapshots {
            history.upsert(snapshot);
        }
        history
    }

    /// Replaces the snapshot for the same month if there is one, then keeps the newest 36.
    pub fn upsert(&mut self, snapshot: HouseholdSnapshot) -> UpsertOutcome {
        let same_month = self
            .snapshots
            .iter()
            .position(|s| s.year() == snapshot.year() && s.month() == snapshot.month());

        let outcome = match same_month {
            Some(index) => {
                self.snapshots[index] = snapshot;
                UpsertOutcome::Updated
            }
            None => {
                self.snapshots.push(snapshot);
                UpsertOutcome::Added
            }
        };
        self.snapshots.sort_by(|a, b| b.date.cmp(&a.date));
        self.snapshots.truncate(MAX_HISTORY_MONTHS);
        outcome
    }

    pub fn latest(&self) -> Option<&HouseholdSnapshot> {
        self.snapshots.first()
    }

    pub fn previous(&self) -> Option<&HouseholdSnapshot> {
        self.snapshots.get(1)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HouseholdSnapshot> {
        self.snapshots.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub headline: HeadlineMetrics,
    pub assumptions: Vec<AssumptionSet>,
    pub cashflow_table: Vec<CashflowTableRow>,
    pub scenario_cost_table: Vec<ScenarioCostTableRow>,
    pub minimum_income_table: Vec<MinimumIncomeRow>,
}

/// Everything the dashboard shows, recomputed from scratch for the latest snapshot.
/// `None` until a snapshot has been recorded.
pub fn calculate_dashboard(
    history: &SnapshotHistory,
    config: &HouseholdConfig,
) -> Option<Dashboard> {
    let latest = history.latest()?;
    let plan_year = latest.year();
    let assumptions = active_assumptions(config);

    let dashboard = Dashboard {
        headline: calculate_headline_metrics(latest, history.previous(), config),
        cashflow_table: calculate_cashflow_table(
            latest,
            config,
            None,
            Some(assumptions.as_slice()),
            Some(plan_year),
        ),
        scenario_cost_table: calculate_scenario_cost_table(config, None, Some(plan_year)),
        minimum_income_table: calculate_minimum_income_table(latest, config),
        assumptions,
    };
    debug!(
        snapshot = %latest.id,
        history_len = history.len(),
        "recalculated dashboard"
    );
    Some(dashboard)
}
