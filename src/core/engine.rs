use super::tax::{
    compute_investment_exit_net, compute_optimal_extraction, compute_paye_tax, compute_stamp_duty,
};
use super::types::{
    AssumptionSet, HORIZON_AGE, HouseholdConfig, HouseholdSnapshot, Partner1Income,
    ScenarioDefinition, ScenarioResult, YearlyProjection,
};

pub const PENSION_ACCESS_AGE: u32 = 57;
const SCHOOL_START_AGE: u32 = 4;
const SCHOOL_END_AGE: u32 = 18;
const UNIVERSITY_START_AGE: u32 = 18;
const POST_UPGRADE_EQUITY_SHARE: f64 = 0.7;
const NEVER_FI_YEARS: u32 = 99;

#[derive(Debug, Clone, Copy)]
struct Balances {
    liquid: f64,
    pension: f64,
    house: f64,
}

#[derive(Debug, Clone, Copy)]
struct WorkStatus {
    partner1: bool,
    partner2: bool,
}

impl WorkStatus {
    fn anyone(self) -> bool {
        self.partner1 || self.partner2
    }
}

#[derive(Debug, Clone, Copy)]
struct YearExpenses {
    total: f64,
    school_fees_active: bool,
    new_house_equity: Option<f64>,
}

pub fn run_scenario_to_exhaustion(
    snapshot: &HouseholdSnapshot,
    config: &HouseholdConfig,
    scenario: &ScenarioDefinition,
    assumptions: &AssumptionSet,
) -> ScenarioResult {
    let start_year = snapshot.year();
    let start_age = config.partner1_age_in(start_year);

    let mut balances = Balances {
        liquid: snapshot.liquid_assets(),
        pension: snapshot.pensions,
        house: snapshot.house_equity,
    };

    let baseline_expenses = config.baseline_annual_expenses();
    let fi_target = config.fi_target.resolve(baseline_expenses);
    let exit_uplift = compute_investment_exit_net(
        config.investment_exit.gross_proceeds,
        config.investment_exit.cost_basis,
    )
    .additional_value;

    let mut projections = Vec::with_capacity((HORIZON_AGE.saturating_sub(start_age) + 1) as usize);
    let mut money_lasts_to_age = HORIZON_AGE;
    let mut fi_achieved_age = 0;

    for age in start_age..=HORIZON_AGE {
        let year = config.partner1_birth_year.saturating_add(age as i32);
        let working = work_status(config, scenario, age, year);

        let partner1_gross = if working.partner1 {
            scenario.partner1_annual_revenue
        } else {
            0.0
        };
        let partner2_gross = if working.partner2 {
            config.partner2_gross_annual()
        } else {
            0.0
        };
        let gross_income = partner1_gross + partner2_gross;
        let taxes = annual_tax(config.partner1_income, partner1_gross, partner2_gross);
        let net_income = gross_income - taxes;

        let expenses = year_expenses(
            config,
            scenario,
            assumptions,
            baseline_expenses,
            year,
            age - start_age,
        );
        if let Some(equity) = expenses.new_house_equity {
            balances.house = equity;
        }

        let mut inheritance_received = false;
        if assumptions.include_inheritance && age == config.inheritance.partner1_age {
            balances.liquid += config.inheritance.amount;
            inheritance_received = true;
        }
        if assumptions.include_investment_exit && age == config.investment_exit.partner1_age {
            balances.liquid += exit_uplift;
        }

        let net_cashflow = net_income - expenses.total;
        apply_growth_and_cashflow(&mut balances, assumptions, net_cashflow, age);

        let total_net_worth = balances.liquid + balances.pension + balances.house;
        if fi_achieved_age == 0 && total_net_worth >= fi_target {
            fi_achieved_age = age;
        }

        projections.push(YearlyProjection {
            year,
            partner1_age: age,
            total_net_worth,
            liquid_assets: balances.liquid,
            pensions: balances.pension,
            house_equity: balances.house,
            gross_income,
            taxes,
            net_income,
            expenses: expenses.total,
            net_cashflow,
            is_working: working.anyone(),
            is_school_fees: expenses.school_fees_active,
            is_retired: !working.anyone(),
            inheritance_received,
        });

        if balances.liquid <= 0.0 && balances.pension <= 0.0 {
            money_lasts_to_age = age;
            break;
        }
    }

    ScenarioResult {
        scenario_id: scenario.id.clone(),
        assumption_id: assumptions.id.clone(),
        money_lasts_to_age,
        time_to_fi: if fi_achieved_age > 0 {
            fi_achieved_age - start_age
        } else {
            NEVER_FI_YEARS
        },
        earliest_stop_work_age: fi_achieved_age,
        projections,
    }
}

fn work_status(
    config: &HouseholdConfig,
    scenario: &ScenarioDefinition,
    age: u32,
    year: i32,
) -> WorkStatus {
    let partner1_until = config
        .partner1_works_until_age
        .unwrap_or(scenario.partner1_works_until_age);
    let partner2_until = config
        .partner2_works_until_age
        .unwrap_or(scenario.partner2_works_until_age);

    // A partner with nothing to earn counts as retired.
    WorkStatus {
        partner1: age < partner1_until && scenario.partner1_annual_revenue > 0.0,
        partner2: config.partner2_age_in(year) < partner2_until
            && !scenario.partner2_on_break(year)
            && config.partner2_gross_annual() > 0.0,
    }
}

fn annual_tax(partner1_income: Partner1Income, partner1_gross: f64, partner2_gross: f64) -> f64 {
    let mut tax = 0.0;
    if partner1_gross > 0.0 {
        tax += match partner1_income {
            Partner1Income::Business { .. } => compute_optimal_extraction(partner1_gross).total_tax,
            Partner1Income::Employed { .. } => compute_paye_tax(partner1_gross),
        };
    }
    if partner2_gross > 0.0 {
        tax += compute_paye_tax(partner2_gross);
    }
    tax
}

fn year_expenses(
    config: &HouseholdConfig,
    scenario: &ScenarioDefinition,
    assumptions: &AssumptionSet,
    baseline_expenses: f64,
    year: i32,
    years_elapsed: u32,
) -> YearExpenses {
    let mut total = baseline_expenses;
    let child_ages = config
        .children()
        .iter()
        .map(|&birth_year| i64::from(year) - i64::from(birth_year))
        .collect::<Vec<_>>();

    let school_ages = i64::from(SCHOOL_START_AGE)..=i64::from(SCHOOL_END_AGE);
    let school_kids = child_ages
        .iter()
        .filter(|&&age| school_ages.contains(&age))
        .count();
    let school_fees_active = config.school_fees.enabled && school_kids > 0;
    if school_fees_active {
        let inflated_fee = config.school_fees.annual_fee_per_child
            * (1.0 + assumptions.school_fee_inflation).powi(years_elapsed as i32);
        total += school_kids as f64 * inflated_fee;
    }

    if config.university.enabled && scenario.include_university {
        let start_age = i64::from(UNIVERSITY_START_AGE);
        let end_age = start_age + i64::from(config.university.years);
        let university_kids = child_ages
            .iter()
            .filter(|&&age| (start_age..end_age).contains(&age))
            .count();
        total += university_kids as f64 * config.university.annual_cost;
    }

    let mut new_house_equity = None;
    let upgrade = &config.house_upgrade;
    if upgrade.enabled && scenario.include_house_upgrade && year == scenario.house_upgrade_year {
        total += upgrade.budget - upgrade.current_value + compute_stamp_duty(upgrade.budget);
        new_house_equity = Some(upgrade.budget * POST_UPGRADE_EQUITY_SHARE);
    }

    YearExpenses {
        total,
        school_fees_active,
        new_house_equity,
    }
}

fn apply_growth_and_cashflow(
    balances: &mut Balances,
    assumptions: &AssumptionSet,
    net_cashflow: f64,
    age: u32,
) {
    balances.pension *= 1.0 + assumptions.real_return_rate;
    balances.liquid *= 1.0 + assumptions.real_return_rate;
    balances.liquid += net_cashflow;

    // Below access age a negative liquid balance is left alone; that is how
    // early exhaustion shows up.
    if balances.liquid < 0.0 && age >= PENSION_ACCESS_AGE {
        let needed = -balances.liquid;
        if balances.pension >= needed {
            balances.pension -= needed;
            balances.liquid = 0.0;
        } else {
            balances.liquid += balances.pension;
            balances.pension = 0.0;
        }
    }

    balances.house *= 1.0 + assumptions.inflation_rate;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::types::{FiTarget, Partner2Salary};
    use chrono::NaiveDate;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    pub(crate) fn demo_snapshot() -> HouseholdSnapshot {
        HouseholdSnapshot {
            id: "demo-dec-2025".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 2).expect("valid date"),
            current_accounts: 19_248.0,
            savings_accounts: 62_518.0,
            isas: 614_271.0,
            pensions: 885_576.0,
            taxable_accounts: 513_808.0,
            house_equity: 474_514.0,
            business_assets: 166_140.0,
            investment_assets: 999_599.0,
            total: 3_735_674.0,
            business_revenue_ytd: 526_259.0,
            partner2_income_ytd: 50_400.0,
            personal_expenses_ytd: 126_515.0,
            business_expenses_ytd: 42_829.0,
            total_expenses_ytd: 169_344.0,
        }
    }

    pub(crate) fn bare_snapshot(liquid: f64, pension: f64, house: f64) -> HouseholdSnapshot {
        HouseholdSnapshot {
            id: "bare".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
            current_accounts: liquid,
            savings_accounts: 0.0,
            isas: 0.0,
            pensions: pension,
            taxable_accounts: 0.0,
            house_equity: house,
            business_assets: 0.0,
            investment_assets: 0.0,
            total: liquid + pension + house,
            business_revenue_ytd: 0.0,
            partner2_income_ytd: 0.0,
            personal_expenses_ytd: 0.0,
            business_expenses_ytd: 0.0,
            total_expenses_ytd: 0.0,
        }
    }

    /// 2025 household: partner 1 aged 40 on 300k business revenue, partner 2 on 45k,
    /// no children, no windfalls, 72k baseline spend.
    pub(crate) fn business_config() -> HouseholdConfig {
        let mut config = HouseholdConfig::default_for_year(2025);
        config.partner1_income = Partner1Income::Business { revenue: 300_000.0 };
        config.partner2_salary = Partner2Salary::Gross { annual: 45_000.0 };
        config.child_birth_years = Vec::new();
        config.school_fees.enabled = false;
        config.house_upgrade.enabled = false;
        config.university.enabled = false;
        config
    }

    pub(crate) fn scenario(partner1_revenue: f64) -> ScenarioDefinition {
        ScenarioDefinition {
            id: "test".to_string(),
            name: "test".to_string(),
            short_name: "test".to_string(),
            partner1_works_until_age: 60,
            partner2_works_until_age: 60,
            partner1_annual_revenue: partner1_revenue,
            partner2_break_years: 0,
            partner2_break_start_year: 0,
            include_house_upgrade: false,
            house_upgrade_year: 0,
            include_university: false,
        }
    }

    pub(crate) fn assumptions(real_return: f64) -> AssumptionSet {
        AssumptionSet {
            id: "test".to_string(),
            name: "test".to_string(),
            real_return_rate: real_return,
            inflation_rate: 0.025,
            school_fee_inflation: 0.05,
            include_inheritance: false,
            include_investment_exit: false,
        }
    }

    fn retired_config(current_age: u32) -> HouseholdConfig {
        let mut config = business_config();
        config.partner1_birth_year = 2025 - current_age as i32;
        config.partner2_birth_year = 2025 - current_age as i32;
        config
    }

    fn retired_scenario() -> ScenarioDefinition {
        let mut s = scenario(0.0);
        s.partner1_works_until_age = 0;
        s.partner2_works_until_age = 0;
        s
    }

    #[test]
    fn demo_household_money_lasts_past_horizon() {
        let config = business_config();
        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(300_000.0),
            &assumptions(0.05),
        );

        assert_eq!(result.money_lasts_to_age, 100);
        assert!(result.earliest_stop_work_age > 0);
        assert!(result.earliest_stop_work_age < 60);
        assert_eq!(result.projections.len(), 61);
        assert_eq!(result.projections[0].partner1_age, 40);
        assert_eq!(result.projections[0].year, 2025);
        assert_eq!(result.projections.last().map(|p| p.partner1_age), Some(100));
    }

    #[test]
    fn first_year_matches_hand_calculation() {
        let config = business_config();
        let snapshot = demo_snapshot();
        let result =
            run_scenario_to_exhaustion(&snapshot, &config, &scenario(300_000.0), &assumptions(0.05));
        let first = &result.projections[0];

        let taxes = compute_optimal_extraction(300_000.0).total_tax + compute_paye_tax(45_000.0);
        let cashflow = 345_000.0 - taxes - 72_000.0;
        assert_approx(first.gross_income, 345_000.0);
        assert_approx(first.taxes, taxes);
        assert_approx(first.expenses, 72_000.0);
        assert_approx(first.net_cashflow, cashflow);
        assert_approx(first.liquid_assets, 2_375_584.0 * 1.05 + cashflow);
        assert_approx(first.pensions, 885_576.0 * 1.05);
        assert_approx(first.house_equity, 474_514.0 * 1.025);
        assert_approx(
            first.total_net_worth,
            first.liquid_assets + first.pensions + first.house_equity,
        );
        assert!(first.is_working);
        assert!(!first.is_retired);
    }

    #[test]
    fn reruns_are_identical() {
        let mut config = business_config();
        config.inheritance.amount = 250_000.0;
        let mut a = assumptions(0.03);
        a.include_inheritance = true;

        let first = run_scenario_to_exhaustion(&demo_snapshot(), &config, &scenario(90_000.0), &a);
        let second = run_scenario_to_exhaustion(&demo_snapshot(), &config, &scenario(90_000.0), &a);
        assert_eq!(first, second);
    }

    #[test]
    fn inheritance_is_ignored_when_assumption_excludes_it() {
        let mut config = business_config();
        config.inheritance.amount = 500_000.0;
        config.inheritance.partner1_age = 45;
        let without_amount = business_config();

        let gated = assumptions(0.05);
        let with_flag = run_scenario_to_exhaustion(&demo_snapshot(), &config, &scenario(0.0), &gated);
        let baseline =
            run_scenario_to_exhaustion(&demo_snapshot(), &without_amount, &scenario(0.0), &gated);
        assert_eq!(with_flag.projections, baseline.projections);
        assert!(with_flag.projections.iter().all(|p| !p.inheritance_received));

        let mut enabled = assumptions(0.05);
        enabled.include_inheritance = true;
        let received =
            run_scenario_to_exhaustion(&demo_snapshot(), &config, &scenario(0.0), &enabled);
        let at_45 = received
            .projections
            .iter()
            .find(|p| p.partner1_age == 45)
            .expect("age 45 simulated");
        let base_45 = baseline
            .projections
            .iter()
            .find(|p| p.partner1_age == 45)
            .expect("age 45 simulated");
        assert!(at_45.inheritance_received);
        // Added before growth, so it compounds for the year it arrives.
        assert!((at_45.liquid_assets - base_45.liquid_assets - 500_000.0 * 1.05).abs() < 1e-3);
    }

    #[test]
    fn investment_exit_adds_net_uplift_at_exit_age() {
        let mut config = business_config();
        config.investment_exit.gross_proceeds = 1_140_000.0;
        config.investment_exit.cost_basis = 82_000.0;
        config.investment_exit.partner1_age = 42;

        let mut a = assumptions(0.0);
        a.inflation_rate = 0.0;
        let off = run_scenario_to_exhaustion(&demo_snapshot(), &config, &scenario(0.0), &a);
        a.include_investment_exit = true;
        let on = run_scenario_to_exhaustion(&demo_snapshot(), &config, &scenario(0.0), &a);

        assert_approx(on.projections[1].liquid_assets, off.projections[1].liquid_assets);
        assert_approx(
            on.projections[2].liquid_assets - off.projections[2].liquid_assets,
            793_500.0,
        );
    }

    #[test]
    fn pension_is_untouched_before_access_age() {
        let config = retired_config(55);
        let snapshot = bare_snapshot(0.0, 1_000_000.0, 0.0);
        let mut a = assumptions(0.0);
        a.inflation_rate = 0.0;
        let result = run_scenario_to_exhaustion(&snapshot, &config, &retired_scenario(), &a);

        let p = &result.projections;
        assert_eq!(p[0].partner1_age, 55);
        assert_approx(p[0].liquid_assets, -72_000.0);
        assert_approx(p[0].pensions, 1_000_000.0);
        assert_eq!(p[1].partner1_age, 56);
        assert_approx(p[1].liquid_assets, -144_000.0);
        assert_approx(p[1].pensions, 1_000_000.0);

        // At 57 the whole shortfall comes out of the pension.
        assert_approx(p[2].liquid_assets, 0.0);
        assert_approx(p[2].pensions, 1_000_000.0 - 216_000.0);
        assert_eq!(p[3].partner1_age, 58);
        assert_approx(p[3].liquid_assets, 0.0);
        assert_approx(p[3].pensions, 1_000_000.0 - 288_000.0);
    }

    #[test]
    fn no_pension_backstop_exhausts_before_access_age() {
        let config = retired_config(50);
        let snapshot = bare_snapshot(100_000.0, 0.0, 300_000.0);
        let result =
            run_scenario_to_exhaustion(&snapshot, &config, &retired_scenario(), &assumptions(0.0));

        // 100k - 72k leaves 28k at 50, then negative at 51.
        assert_eq!(result.money_lasts_to_age, 51);
        assert_eq!(result.projections.len(), 2);
        assert_eq!(result.earliest_stop_work_age, 0);
        assert_eq!(result.time_to_fi, 99);
    }

    #[test]
    fn pension_partially_covers_shortfall_then_exhausts() {
        let config = retired_config(60);
        let snapshot = bare_snapshot(0.0, 100_000.0, 0.0);
        let result =
            run_scenario_to_exhaustion(&snapshot, &config, &retired_scenario(), &assumptions(0.0));

        let p = &result.projections;
        assert_approx(p[0].pensions, 28_000.0);
        assert_approx(p[0].liquid_assets, 0.0);
        assert_approx(p[1].pensions, 0.0);
        assert_approx(p[1].liquid_assets, -44_000.0);
        assert_eq!(result.money_lasts_to_age, 61);
    }

    #[test]
    fn zero_income_household_draws_down_every_year() {
        let mut config = business_config();
        config.partner1_birth_year = 2025 - 50;
        config.partner2_birth_year = 2025 - 50;
        let snapshot = bare_snapshot(400_000.0, 300_000.0, 0.0);
        let mut s = scenario(0.0);
        s.partner2_break_years = 50;
        s.partner2_break_start_year = 2025;

        let result = run_scenario_to_exhaustion(&snapshot, &config, &s, &assumptions(0.03));
        assert!(result.projections.iter().all(|p| p.is_retired && !p.is_working));
        assert!(result.projections.iter().all(|p| p.gross_income == 0.0));

        let mut previous_liquid = 400_000.0;
        for p in result
            .projections
            .iter()
            .take_while(|p| p.partner1_age < PENSION_ACCESS_AGE)
        {
            assert!(p.liquid_assets < previous_liquid);
            previous_liquid = p.liquid_assets;
        }
        assert!(result.money_lasts_to_age < 100);
    }

    #[test]
    fn partner2_break_window_removes_salary_only_inside_window() {
        let config = business_config();
        let mut s = scenario(0.0);
        s.partner2_break_years = 2;
        s.partner2_break_start_year = 2026;

        let result = run_scenario_to_exhaustion(&demo_snapshot(), &config, &s, &assumptions(0.05));
        let incomes = result
            .projections
            .iter()
            .take(4)
            .map(|p| p.gross_income)
            .collect::<Vec<_>>();
        assert_eq!(incomes, vec![45_000.0, 0.0, 0.0, 45_000.0]);
    }

    #[test]
    fn config_override_beats_scenario_work_age() {
        let mut config = business_config();
        config.partner1_works_until_age = Some(42);
        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(100_000.0),
            &assumptions(0.05),
        );
        let partner1_income = |i: usize| result.projections[i].gross_income - 45_000.0;
        assert_approx(partner1_income(0), 100_000.0);
        assert_approx(partner1_income(1), 100_000.0);
        assert_approx(partner1_income(2), 0.0);
    }

    #[test]
    fn employed_mode_taxes_partner1_as_paye() {
        let mut config = business_config();
        config.partner1_income = Partner1Income::Employed { salary: 80_000.0 };
        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(80_000.0),
            &assumptions(0.05),
        );
        assert_approx(
            result.projections[0].taxes,
            compute_paye_tax(80_000.0) + compute_paye_tax(45_000.0),
        );
    }

    #[test]
    fn school_fees_inflate_and_stop_after_eighteen() {
        let mut config = business_config();
        config.child_birth_years = vec![2025 - 17];
        config.school_fees.enabled = true;
        config.school_fees.annual_fee_per_child = 20_000.0;

        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(300_000.0),
            &assumptions(0.05),
        );
        let p = &result.projections;
        assert!(p[0].is_school_fees);
        assert_approx(p[0].expenses, 72_000.0 + 20_000.0);
        assert!(p[1].is_school_fees);
        assert_approx(p[1].expenses, 72_000.0 + 21_000.0);
        assert!(!p[2].is_school_fees);
        assert_approx(p[2].expenses, 72_000.0);
    }

    #[test]
    fn university_costs_need_config_and_scenario_flags() {
        let mut config = business_config();
        config.child_birth_years = vec![2025 - 18];
        config.university.enabled = true;
        config.university.annual_cost = 30_000.0;
        config.university.years = 3;

        let mut s = scenario(300_000.0);
        let without = run_scenario_to_exhaustion(&demo_snapshot(), &config, &s, &assumptions(0.05));
        assert_approx(without.projections[0].expenses, 72_000.0);

        s.include_university = true;
        let with = run_scenario_to_exhaustion(&demo_snapshot(), &config, &s, &assumptions(0.05));
        let expenses = with
            .projections
            .iter()
            .take(4)
            .map(|p| p.expenses)
            .collect::<Vec<_>>();
        assert_eq!(expenses, vec![102_000.0, 102_000.0, 102_000.0, 72_000.0]);
    }

    #[test]
    fn house_upgrade_charges_delta_and_stamp_duty_and_resets_equity() {
        let mut config = business_config();
        config.house_upgrade.enabled = true;
        config.house_upgrade.budget = 1_500_000.0;
        config.house_upgrade.current_value = 950_000.0;
        let mut s = scenario(300_000.0);
        s.include_house_upgrade = true;
        s.house_upgrade_year = 2027;

        let result = run_scenario_to_exhaustion(&demo_snapshot(), &config, &s, &assumptions(0.05));
        let p = &result.projections;
        assert_approx(p[1].expenses, 72_000.0);
        assert_approx(p[2].expenses, 72_000.0 + 550_000.0 + 91_250.0);
        assert_approx(p[2].house_equity, 1_050_000.0 * 1.025);
        assert_approx(p[3].expenses, 72_000.0);
    }

    #[test]
    fn fixed_fi_target_records_first_crossing() {
        let mut config = business_config();
        config.fi_target = FiTarget::Amount(10_000_000.0);
        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(300_000.0),
            &assumptions(0.05),
        );
        let fi_age = result.earliest_stop_work_age;
        assert!(fi_age > 40);
        let crossing = result
            .projections
            .iter()
            .position(|p| p.total_net_worth >= 10_000_000.0)
            .expect("target crossed");
        assert_eq!(result.projections[crossing].partner1_age, fi_age);
        assert_eq!(result.time_to_fi, fi_age - 40);
    }

    #[test]
    fn household_older_than_horizon_has_no_projections() {
        let mut config = business_config();
        config.partner1_birth_year = 1900;
        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(0.0),
            &assumptions(0.05),
        );
        assert!(result.projections.is_empty());
        assert_eq!(result.money_lasts_to_age, 100);
    }

    #[test]
    fn extreme_birth_years_saturate_instead_of_overflowing() {
        let mut config = business_config();
        config.partner1_birth_year = i32::MIN;
        config.partner2_birth_year = i32::MAX;
        assert_eq!(config.partner1_age_in(2025), 2_147_485_673);
        assert_eq!(config.partner2_age_in(2025), 0);
        assert_eq!(config.partner1_age_in(i32::MAX), u32::MAX);

        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(300_000.0),
            &assumptions(0.05),
        );
        assert!(result.projections.is_empty());

        let mut config = business_config();
        config.school_fees.enabled = true;
        config.child_birth_years = vec![i32::MIN, i32::MAX];
        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &config,
            &scenario(300_000.0),
            &assumptions(0.05),
        );
        assert!(!result.projections[0].is_school_fees);
        assert_approx(result.projections[0].expenses, 72_000.0);
    }

    #[test]
    fn unbounded_university_years_cover_every_adult_child() {
        let mut config = business_config();
        config.child_birth_years = vec![2025 - 20];
        config.university.enabled = true;
        config.university.annual_cost = 30_000.0;
        config.university.years = u32::MAX;
        let mut s = scenario(300_000.0);
        s.include_university = true;

        let result = run_scenario_to_exhaustion(&demo_snapshot(), &config, &s, &assumptions(0.05));
        assert_approx(result.projections[0].expenses, 102_000.0);
        assert_approx(result.projections[10].expenses, 102_000.0);
    }

    #[test]
    fn break_window_at_integer_limits() {
        let mut s = scenario(0.0);
        s.partner2_break_years = u32::MAX;
        s.partner2_break_start_year = i32::MAX;
        assert!(!s.partner2_on_break(2025));
        assert!(s.partner2_on_break(i32::MAX));

        s.partner2_break_start_year = i32::MIN;
        assert!(s.partner2_on_break(2025));
        assert!(!s.partner2_on_break(i32::MAX));

        let result = run_scenario_to_exhaustion(
            &demo_snapshot(),
            &business_config(),
            &s,
            &assumptions(0.05),
        );
        assert!(result.projections.iter().all(|p| p.is_retired));
    }

    #[test]
    fn business_revenue_levels_do_not_shorten_longevity() {
        let config = retired_config(45);
        let snapshot = bare_snapshot(200_000.0, 150_000.0, 0.0);
        let mut previous = 0;
        for revenue in [0.0, 25_000.0, 50_000.0, 100_000.0, 200_000.0, 400_000.0] {
            let mut s = scenario(revenue);
            s.partner2_works_until_age = 0;
            let age =
                run_scenario_to_exhaustion(&snapshot, &config, &s, &assumptions(0.03))
                    .money_lasts_to_age;
            assert!(age >= previous, "revenue {revenue} gave {age} < {previous}");
            previous = age;
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_higher_salary_never_shortens_longevity(
            current_age in 25u32..65,
            liquid in 0u32..800_000,
            pension in 0u32..800_000,
            salary in 0u32..250_000,
            raise in 1u32..100_000,
            return_bp in 0u32..700
        ) {
            let mut config = business_config();
            config.partner1_income = Partner1Income::Employed { salary: salary as f64 };
            config.partner1_birth_year = 2025 - current_age as i32;
            config.partner2_birth_year = 2025 - current_age as i32;
            let snapshot = bare_snapshot(liquid as f64, pension as f64, 0.0);
            let a = assumptions(return_bp as f64 / 10_000.0);

            let low = run_scenario_to_exhaustion(&snapshot, &config, &scenario(salary as f64), &a);
            let high = run_scenario_to_exhaustion(
                &snapshot,
                &config,
                &scenario((salary + raise) as f64),
                &a,
            );
            prop_assert!(high.money_lasts_to_age >= low.money_lasts_to_age);
            prop_assert!(low.money_lasts_to_age >= current_age);
            prop_assert!(low.money_lasts_to_age <= 100);
        }

        #[test]
        fn prop_pension_is_never_negative(
            current_age in 30u32..70,
            liquid in 0u32..300_000,
            pension in 0u32..300_000,
            return_bp in 0u32..600
        ) {
            let config = retired_config(current_age);
            let snapshot = bare_snapshot(liquid as f64, pension as f64, 100_000.0);
            let result = run_scenario_to_exhaustion(
                &snapshot,
                &config,
                &retired_scenario(),
                &assumptions(return_bp as f64 / 10_000.0),
            );
            for p in &result.projections {
                prop_assert!(p.pensions >= 0.0);
                prop_assert!(p.house_equity >= 0.0);
                if p.partner1_age >= PENSION_ACCESS_AGE && p.pensions > 0.0 {
                    prop_assert!(p.liquid_assets >= 0.0);
                }
            }
            let last = result.projections.last().expect("at least one year");
            if result.money_lasts_to_age < 100 {
                prop_assert!(last.liquid_assets <= 0.0 && last.pensions <= 0.0);
                prop_assert!(last.partner1_age == result.money_lasts_to_age);
            }
        }
    }
}
