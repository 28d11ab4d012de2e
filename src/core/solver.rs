use tracing::debug;

use super::engine::run_scenario_to_exhaustion;
use super::tax::{compute_optimal_extraction, compute_paye_tax};
use super::types::{
    AssumptionSet, HouseholdConfig, HouseholdSnapshot, ScenarioDefinition, ScenarioResult,
    SolvedIncome,
};

pub const INCOME_SEARCH_MAX: f64 = 500_000.0;
pub const FI_INCOME_SEARCH_MAX: f64 = 1_000_000.0;
pub const INCOME_STEP: f64 = 5_000.0;
pub const DEFAULT_RETIREMENT_AGE: u32 = 60;

const PAYE_SEARCH_TOLERANCE: f64 = 1_000.0;
const PAYE_SEARCH_HEADROOM: f64 = 1.5;
const SURPLUS_WINDOW_YEARS: usize = 3;
const INDEFINITE_BREAK_YEARS: u32 = 50;

/// Narrows `[lo, hi]` until it is no wider than `tolerance`, keeping `hi` on the
/// side where `meets` holds. Probes are taken at `midpoint(lo, hi)`.
fn bisect(
    mut lo: f64,
    mut hi: f64,
    tolerance: f64,
    midpoint: fn(f64, f64) -> f64,
    mut meets: impl FnMut(f64) -> bool,
) -> f64 {
    while hi - lo > tolerance {
        let mid = midpoint(lo, hi);
        if meets(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}

fn whole_pound_midpoint(lo: f64, hi: f64) -> f64 {
    ((lo + hi) * 0.5).floor()
}

fn exact_midpoint(lo: f64, hi: f64) -> f64 {
    (lo + hi) * 0.5
}

fn round_up_to_step(value: f64) -> f64 {
    (value / INCOME_STEP).ceil() * INCOME_STEP
}

fn solved_within(upper: f64, hi: f64) -> SolvedIncome {
    let value = round_up_to_step(hi);
    SolvedIncome {
        value,
        hits_cap: value >= upper,
    }
}

/// Scenario the solvers simulate: only partner 1's revenue varies. Partner 2 is either on
/// their normal plan or on a break long enough to cover the horizon.
fn solver_scenario(
    config: &HouseholdConfig,
    plan_year: i32,
    partner1_revenue: f64,
    partner2_working: bool,
) -> ScenarioDefinition {
    ScenarioDefinition {
        id: "test".to_string(),
        name: "test".to_string(),
        short_name: "test".to_string(),
        partner1_works_until_age: config
            .partner1_works_until_age
            .unwrap_or(DEFAULT_RETIREMENT_AGE),
        partner2_works_until_age: if partner2_working {
            config
                .partner2_works_until_age
                .unwrap_or(DEFAULT_RETIREMENT_AGE)
        } else {
            0
        },
        partner1_annual_revenue: partner1_revenue,
        partner2_break_years: if partner2_working {
            0
        } else {
            INDEFINITE_BREAK_YEARS
        },
        partner2_break_start_year: plan_year.saturating_add(1),
        include_house_upgrade: false,
        house_upgrade_year: 0,
        include_university: false,
    }
}

fn simulate_at(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
    assumptions: &AssumptionSet,
    partner2_working: bool,
    revenue: f64,
) -> ScenarioResult {
    let scenario = solver_scenario(config, snapshot.year(), revenue, partner2_working);
    run_scenario_to_exhaustion(snapshot, config, &scenario, assumptions)
}

/// Lowest partner-1 revenue that keeps money lasting to `target_age`.
pub fn find_minimum_income(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
    assumptions: &AssumptionSet,
    partner2_working: bool,
    target_age: u32,
) -> SolvedIncome {
    let hi = bisect(
        0.0,
        INCOME_SEARCH_MAX,
        INCOME_STEP,
        whole_pound_midpoint,
        |revenue| {
            simulate_at(snapshot, config, assumptions, partner2_working, revenue)
                .money_lasts_to_age
                >= target_age
        },
    );
    let solved = solved_within(INCOME_SEARCH_MAX, hi);
    debug!(
        assumption = %assumptions.id,
        partner2_working,
        target_age,
        value = solved.value,
        hits_cap = solved.hits_cap,
        "solved minimum income for longevity"
    );
    solved
}

/// Lowest partner-1 revenue at which net worth grows by `target_surplus` a year,
/// averaged over the first three projected years.
pub fn find_minimum_income_for_surplus(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
    assumptions: &AssumptionSet,
    partner2_working: bool,
    target_surplus: f64,
) -> SolvedIncome {
    let hi = bisect(
        0.0,
        INCOME_SEARCH_MAX,
        INCOME_STEP,
        whole_pound_midpoint,
        |revenue| {
            let result = simulate_at(snapshot, config, assumptions, partner2_working, revenue);
            average_early_growth(&result).is_some_and(|growth| growth >= target_surplus)
        },
    );
    let solved = solved_within(INCOME_SEARCH_MAX, hi);
    debug!(
        assumption = %assumptions.id,
        partner2_working,
        target_surplus,
        value = solved.value,
        hits_cap = solved.hits_cap,
        "solved minimum income for surplus"
    );
    solved
}

fn average_early_growth(result: &ScenarioResult) -> Option<f64> {
    if result.projections.len() < SURPLUS_WINDOW_YEARS {
        return None;
    }
    let first = result.projections[0].total_net_worth;
    let last = result.projections[SURPLUS_WINDOW_YEARS - 1].total_net_worth;
    Some((last - first) / (SURPLUS_WINDOW_YEARS - 1) as f64)
}

/// Lowest partner-1 revenue that reaches the FI target no later than the planned
/// retirement age. Searches up to £1m and flags `hits_cap` when even that is short.
pub fn find_minimum_income_for_fi_target(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
    assumptions: &AssumptionSet,
    partner2_working: bool,
) -> SolvedIncome {
    let retirement_age = config
        .partner1_works_until_age
        .unwrap_or(DEFAULT_RETIREMENT_AGE);
    let reaches_fi = |revenue: f64| {
        let fi_age = simulate_at(snapshot, config, assumptions, partner2_working, revenue)
            .earliest_stop_work_age;
        fi_age > 0 && fi_age <= retirement_age
    };

    if reaches_fi(0.0) {
        debug!(
            assumption = %assumptions.id,
            partner2_working,
            "FI target reached without partner 1 income"
        );
        return SolvedIncome {
            value: 0.0,
            hits_cap: false,
        };
    }

    let hi = bisect(
        0.0,
        FI_INCOME_SEARCH_MAX,
        INCOME_STEP,
        whole_pound_midpoint,
        reaches_fi,
    );
    let solved = solved_within(FI_INCOME_SEARCH_MAX, hi);
    debug!(
        assumption = %assumptions.id,
        partner2_working,
        retirement_age,
        value = solved.value,
        hits_cap = solved.hits_cap,
        "solved minimum income for FI target"
    );
    solved
}

/// PAYE salary, rounded up to the next £5k, that takes home at least what
/// `business_revenue` does through a limited company.
pub fn calculate_paye_equivalent(business_revenue: f64) -> f64 {
    let target_net = compute_optimal_extraction(business_revenue).net_income;
    let hi = bisect(
        0.0,
        business_revenue.max(0.0) * PAYE_SEARCH_HEADROOM,
        PAYE_SEARCH_TOLERANCE,
        exact_midpoint,
        |gross| gross - compute_paye_tax(gross) >= target_net,
    );
    round_up_to_step(hi)
}
