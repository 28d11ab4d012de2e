use chrono::{Datelike, Local};
use tracing::debug;

use super::engine::run_scenario_to_exhaustion;
use super::scenarios::{
    ALL_WINDFALLS_ID, BASELINE_ID, NO_WINDFALLS_ID, active_assumptions, assumption_by_id,
    generate_scenarios,
};
use super::solver::{
    DEFAULT_RETIREMENT_AGE, calculate_paye_equivalent, find_minimum_income,
    find_minimum_income_for_fi_target, find_minimum_income_for_surplus,
};
use super::types::{
    AssumptionSet, CashflowCell, CashflowTableRow, HORIZON_AGE, HouseholdConfig,
    HouseholdSnapshot, IncomeColumns, IncomeThreshold, MinimumIncomeRow, ScenarioCostTableRow,
    ScenarioDefinition, SolvedIncome,
};

pub const SURPLUS_TARGET: f64 = 50_000.0;

fn scenarios_or_generated(
    config: &HouseholdConfig,
    scenarios: Option<&[ScenarioDefinition]>,
    plan_year: i32,
) -> Vec<ScenarioDefinition> {
    match scenarios {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => generate_scenarios(config, plan_year),
    }
}

/// Money-lasts-to age for every scenario under every assumption set. Missing scenarios
/// are generated from config; missing assumptions fall back to the active catalog.
pub fn calculate_cashflow_table(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
    scenarios: Option<&[ScenarioDefinition]>,
    assumptions: Option<&[AssumptionSet]>,
    plan_year: Option<i32>,
) -> Vec<CashflowTableRow> {
    let plan_year = plan_year.unwrap_or_else(|| snapshot.year());
    let scenarios = scenarios_or_generated(config, scenarios, plan_year);
    let assumptions = match assumptions {
        Some(list) => list.to_vec(),
        None => active_assumptions(config),
    };

    let rows = scenarios
        .iter()
        .map(|scenario| CashflowTableRow {
            scenario_id: scenario.id.clone(),
            scenario_name: scenario.name.clone(),
            results: assumptions
                .iter()
                .map(|set| CashflowCell {
                    assumption_id: set.id.clone(),
                    money_lasts_to_age: run_scenario_to_exhaustion(snapshot, config, scenario, set)
                        .money_lasts_to_age,
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    debug!(
        scenarios = rows.len(),
        assumptions = assumptions.len(),
        plan_year,
        "built cashflow table"
    );
    rows
}

fn remaining_years(until_age: u32, current_age: u32) -> u32 {
    until_age.saturating_sub(current_age)
}

/// Extra money each scenario commits compared with the first (baseline) scenario.
/// Pure arithmetic; nothing is simulated.
pub fn calculate_scenario_cost_table(
    config: &HouseholdConfig,
    scenarios: Option<&[ScenarioDefinition]>,
    plan_year: Option<i32>,
) -> Vec<ScenarioCostTableRow> {
    let plan_year = plan_year.unwrap_or_else(|| Local::now().year());
    let scenarios = scenarios_or_generated(config, scenarios, plan_year);
    let Some(baseline) = scenarios.first() else {
        return Vec::new();
    };

    let partner1_age = config.partner1_age_in(plan_year);
    let partner2_age = config.partner2_age_in(plan_year);
    let partner2_gross = config.partner2_gross_annual();
    let child_count = config.children().len() as f64;

    scenarios
        .iter()
        .map(|scenario| {
            let mut extra_cost = 0.0;

            let baseline_years = remaining_years(baseline.partner1_works_until_age, partner1_age);
            let scenario_years = remaining_years(scenario.partner1_works_until_age, partner1_age);
            if scenario_years < baseline_years {
                extra_cost +=
                    (baseline_years - scenario_years) as f64 * scenario.partner1_annual_revenue;
            }

            if scenario.partner2_break_years > 0 {
                extra_cost += scenario.partner2_break_years as f64 * partner2_gross;
            } else if scenario.partner2_works_until_age < baseline.partner2_works_until_age {
                let lost = remaining_years(baseline.partner2_works_until_age, partner2_age)
                    .saturating_sub(remaining_years(scenario.partner2_works_until_age, partner2_age));
                extra_cost += lost as f64 * partner2_gross;
            }

            if scenario.include_house_upgrade {
                extra_cost += config.house_upgrade.budget;
            }
            if scenario.include_university {
                extra_cost +=
                    child_count * config.university.years as f64 * config.university.annual_cost;
            }

            ScenarioCostTableRow {
                scenario_id: scenario.id.clone(),
                scenario_name: scenario.name.clone(),
                extra_cost,
                is_baseline: scenario.id == BASELINE_ID,
            }
        })
        .collect()
}

fn with_paye_alternative(
    partner2_working: SolvedIncome,
    partner2_break: SolvedIncome,
) -> IncomeColumns {
    IncomeColumns {
        partner2_working,
        partner2_break,
        paye_alternative: SolvedIncome {
            value: calculate_paye_equivalent(partner2_working.value),
            hits_cap: partner2_working.hits_cap,
        },
    }
}

/// Three income thresholds, each solved with partner 2 working and on an indefinite
/// break, under the 5% no-windfall and all-windfall assumption sets.
pub fn calculate_minimum_income_table(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
) -> Vec<MinimumIncomeRow> {
    let (Some(no_windfalls), Some(all_windfalls)) = (
        assumption_by_id(NO_WINDFALLS_ID),
        assumption_by_id(ALL_WINDFALLS_ID),
    ) else {
        return Vec::new();
    };
    let retirement_age = config
        .partner1_works_until_age
        .unwrap_or(DEFAULT_RETIREMENT_AGE);

    let columns = |solve: &dyn Fn(&AssumptionSet, bool) -> SolvedIncome| {
        (
            with_paye_alternative(solve(&no_windfalls, true), solve(&no_windfalls, false)),
            with_paye_alternative(solve(&all_windfalls, true), solve(&all_windfalls, false)),
        )
    };

    let (coast_without, coast_with) = columns(&|set, partner2_working| {
        find_minimum_income(snapshot, config, set, partner2_working, HORIZON_AGE)
    });
    let (surplus_without, surplus_with) = columns(&|set, partner2_working| {
        find_minimum_income_for_surplus(snapshot, config, set, partner2_working, SURPLUS_TARGET)
    });
    let (fi_without, fi_with) = columns(&|set, partner2_working| {
        find_minimum_income_for_fi_target(snapshot, config, set, partner2_working)
    });

    let rows = vec![
        MinimumIncomeRow {
            threshold: IncomeThreshold::CoastFi,
            label: "CoastFI".to_string(),
            description: "Zero real change in net worth".to_string(),
            without_windfalls: coast_without,
            with_windfalls: coast_with,
        },
        MinimumIncomeRow {
            threshold: IncomeThreshold::Surplus,
            label: "Surplus".to_string(),
            description: "+£50k real growth per year".to_string(),
            without_windfalls: surplus_without,
            with_windfalls: surplus_with,
        },
        MinimumIncomeRow {
            threshold: IncomeThreshold::Breakeven,
            label: "Achieve FI".to_string(),
            description: format!("Hit FI target by age {retirement_age}"),
            without_windfalls: fi_without,
            with_windfalls: fi_with,
        },
    ];
    debug!(
        fi_capped = fi_without.partner2_working.hits_cap,
        "built minimum income table"
    );
    rows
}
