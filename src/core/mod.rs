mod engine;
mod headline;
mod history;
mod scenarios;
mod solver;
mod tables;
mod tax;
mod types;

pub use engine::{PENSION_ACCESS_AGE, run_scenario_to_exhaustion};
pub use headline::{
    annualize_ytd, calculate_headline_metrics, estimate_annual_savings, runway_years,
    years_to_target,
};
pub use history::{Dashboard, SnapshotHistory, UpsertOutcome, calculate_dashboard};
pub use scenarios::{
    active_assumptions, assumption_by_id, default_assumptions, generate_scenarios,
    includes_house_upgrade, includes_partner_break, includes_university,
};
pub use solver::{
    calculate_paye_equivalent, find_minimum_income, find_minimum_income_for_fi_target,
    find_minimum_income_for_surplus,
};
pub use tables::{
    calculate_cashflow_table, calculate_minimum_income_table, calculate_scenario_cost_table,
};
pub use tax::{
    compute_business_gross_for_net, compute_gross_from_net, compute_investment_exit_net,
    compute_optimal_extraction, compute_paye_tax, compute_stamp_duty, corporation_tax,
};
pub use types::{
    AssumptionSet, CashflowCell, CashflowTableRow, ExtractionResult, FiTarget, HeadlineMetrics,
    HouseUpgrade, HouseholdConfig, HouseholdSnapshot, IncomeColumns, IncomeThreshold,
    Inheritance, InvestmentExit, InvestmentExitNet, MAX_CHILDREN, MinimumIncomeRow,
    Partner1Income, Partner2Salary, ScenarioCostTableRow, ScenarioDefinition, ScenarioResult,
    SchoolFees, SolvedIncome, University, YearlyProjection,
};
