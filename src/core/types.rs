use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::tax::{compute_gross_from_net, compute_paye_tax};

pub const MAX_CHILDREN: usize = 4;
pub const HORIZON_AGE: u32 = 100;

/// Point-in-time balance sheet plus year-to-date flows, as captured by the data-entry layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdSnapshot {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,

    #[serde(default)]
    pub current_accounts: f64,
    #[serde(default)]
    pub savings_accounts: f64,
    #[serde(default)]
    pub isas: f64,
    #[serde(default)]
    pub pensions: f64,
    #[serde(default)]
    pub taxable_accounts: f64,
    #[serde(default)]
    pub house_equity: f64,
    #[serde(default)]
    pub business_assets: f64,
    #[serde(default)]
    pub investment_assets: f64,
    #[serde(default)]
    pub total: f64,

    #[serde(default)]
    pub business_revenue_ytd: f64,
    #[serde(default)]
    pub partner2_income_ytd: f64,
    #[serde(default)]
    pub personal_expenses_ytd: f64,
    #[serde(default)]
    pub business_expenses_ytd: f64,
    #[serde(default)]
    pub total_expenses_ytd: f64,
}

impl HouseholdSnapshot {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Cash, savings and wrappers; excludes business holdings.
    pub fn cash_and_wrappers(&self) -> f64 {
        self.isas + self.taxable_accounts + self.current_accounts + self.savings_accounts
    }

    pub fn business_holdings(&self) -> f64 {
        self.business_assets + self.investment_assets
    }

    /// Everything the runner treats as spendable before pension access.
    pub fn liquid_assets(&self) -> f64 {
        self.cash_and_wrappers() + self.business_holdings()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Partner1Income {
    Business { revenue: f64 },
    Employed { salary: f64 },
}

impl Partner1Income {
    pub fn annual_amount(self) -> f64 {
        match self {
            Partner1Income::Business { revenue } => revenue,
            Partner1Income::Employed { salary } => salary,
        }
    }

    pub fn is_business(self) -> bool {
        matches!(self, Partner1Income::Business { .. })
    }
}

/// Partner 2 is always PAYE; the user enters whichever side of the salary they know.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Partner2Salary {
    Gross { annual: f64 },
    Net { annual: f64 },
}

impl Partner2Salary {
    pub fn gross_annual(self) -> f64 {
        match self {
            Partner2Salary::Gross { annual } => annual.max(0.0),
            Partner2Salary::Net { annual } => compute_gross_from_net(annual),
        }
    }

    pub fn net_annual(self) -> f64 {
        match self {
            Partner2Salary::Gross { annual } => {
                let gross = annual.max(0.0);
                gross - compute_paye_tax(gross)
            }
            Partner2Salary::Net { annual } => annual.max(0.0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "kebab-case")]
pub enum FiTarget {
    Multiplier(f64),
    Amount(f64),
}

impl FiTarget {
    pub fn resolve(self, annual_expenses: f64) -> f64 {
        match self {
            FiTarget::Multiplier(multiple) => annual_expenses * multiple,
            FiTarget::Amount(amount) => amount,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolFees {
    pub enabled: bool,
    pub annual_fee_per_child: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inheritance {
    pub amount: f64,
    pub partner1_age: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentExit {
    pub gross_proceeds: f64,
    pub cost_basis: f64,
    pub partner1_age: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseUpgrade {
    pub enabled: bool,
    pub budget: f64,
    pub current_value: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub enabled: bool,
    pub annual_cost: f64,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdConfig {
    pub partner1_name: String,
    pub partner2_name: String,
    pub partner1_birth_year: i32,
    pub partner2_birth_year: i32,
    pub child_birth_years: Vec<i32>,

    pub partner1_income: Partner1Income,
    pub partner2_salary: Partner2Salary,

    pub personal_expenses_monthly: f64,
    pub business_expenses_monthly: f64,
    pub school_fees: SchoolFees,
    pub fi_target: FiTarget,

    /// Overrides every scenario's work-until age when set.
    pub partner1_works_until_age: Option<u32>,
    pub partner2_works_until_age: Option<u32>,

    pub inheritance: Inheritance,
    pub investment_exit: InvestmentExit,
    pub house_upgrade: HouseUpgrade,
    pub university: University,

    /// Empty means every synthesized scenario is shown.
    #[serde(default)]
    pub enabled_scenario_ids: Vec<String>,
}

impl HouseholdConfig {
    pub fn default_for_year(year: i32) -> Self {
        Self {
            partner1_name: "Partner 1".to_string(),
            partner2_name: "Partner 2".to_string(),
            partner1_birth_year: year - 40,
            partner2_birth_year: year - 39,
            child_birth_years: vec![year - 7, year - 3],
            partner1_income: Partner1Income::Employed { salary: 60_000.0 },
            partner2_salary: Partner2Salary::Gross { annual: 50_000.0 },
            personal_expenses_monthly: 5_000.0,
            business_expenses_monthly: 1_000.0,
            school_fees: SchoolFees {
                enabled: true,
                annual_fee_per_child: 18_000.0,
            },
            fi_target: FiTarget::Multiplier(25.0),
            partner1_works_until_age: None,
            partner2_works_until_age: None,
            inheritance: Inheritance {
                amount: 0.0,
                partner1_age: 50,
            },
            investment_exit: InvestmentExit {
                gross_proceeds: 0.0,
                cost_basis: 0.0,
                partner1_age: 45,
            },
            house_upgrade: HouseUpgrade {
                enabled: true,
                budget: 1_500_000.0,
                current_value: 950_000.0,
            },
            university: University {
                enabled: true,
                annual_cost: 65_000.0,
                years: 4,
            },
            enabled_scenario_ids: Vec::new(),
        }
    }

    pub fn children(&self) -> &[i32] {
        let count = self.child_birth_years.len().min(MAX_CHILDREN);
        &self.child_birth_years[..count]
    }

    pub fn partner1_age_in(&self, year: i32) -> u32 {
        age_between(self.partner1_birth_year, year)
    }

    pub fn partner2_age_in(&self, year: i32) -> u32 {
        age_between(self.partner2_birth_year, year)
    }

    /// Fixed baseline spend, deliberately independent of any snapshot's YTD figures.
    pub fn baseline_annual_expenses(&self) -> f64 {
        (self.personal_expenses_monthly + self.business_expenses_monthly) * 12.0
    }

    pub fn partner2_gross_annual(&self) -> f64 {
        self.partner2_salary.gross_annual()
    }
}

/// Whole years from `birth_year` to `year`, floored at 0 and saturating at `u32::MAX`.
pub(crate) fn age_between(birth_year: i32, year: i32) -> u32 {
    let age = i64::from(year) - i64::from(birth_year);
    age.clamp(0, i64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionSet {
    pub id: String,
    pub name: String,
    pub real_return_rate: f64,
    pub inflation_rate: f64,
    pub school_fee_inflation: f64,
    pub include_inheritance: bool,
    pub include_investment_exit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub id: String,
    pub name: String,
    pub short_name: String,

    pub partner1_works_until_age: u32,
    pub partner2_works_until_age: u32,
    pub partner1_annual_revenue: f64,

    pub partner2_break_years: u32,
    pub partner2_break_start_year: i32,

    pub include_house_upgrade: bool,
    pub house_upgrade_year: i32,
    pub include_university: bool,
}

impl ScenarioDefinition {
    pub fn partner2_on_break(&self, year: i32) -> bool {
        let start = i64::from(self.partner2_break_start_year);
        let year = i64::from(year);
        self.partner2_break_years > 0
            && year >= start
            && year < start + i64::from(self.partner2_break_years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: i32,
    pub partner1_age: u32,

    pub total_net_worth: f64,
    pub liquid_assets: f64,
    pub pensions: f64,
    pub house_equity: f64,

    pub gross_income: f64,
    pub taxes: f64,
    pub net_income: f64,
    pub expenses: f64,
    pub net_cashflow: f64,

    pub is_working: bool,
    pub is_school_fees: bool,
    pub is_retired: bool,
    pub inheritance_received: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub assumption_id: String,
    /// Capped at 100, which the UI renders as "100+".
    pub money_lasts_to_age: u32,
    pub time_to_fi: u32,
    /// Age the FI target was first reached, 0 if never.
    pub earliest_stop_work_age: u32,
    pub projections: Vec<YearlyProjection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub salary: f64,
    pub dividends: f64,
    pub corporation_tax: f64,
    pub income_tax: f64,
    pub national_insurance: f64,
    pub dividend_tax: f64,
    pub total_tax: f64,
    pub net_income: f64,
    pub effective_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentExitNet {
    pub gross_proceeds: f64,
    pub gain: f64,
    pub corporation_tax: f64,
    pub net_proceeds: f64,
    pub additional_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineMetrics {
    pub net_worth: f64,
    pub net_worth_change: f64,
    pub net_worth_change_percent: f64,

    pub fi_target: f64,
    pub fi_progress: f64,

    pub time_to_fi: u32,
    pub runway: u32,

    pub liquid_assets: f64,
    pub pension_assets: f64,
    pub business_assets: f64,
    pub property_equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowCell {
    pub assumption_id: String,
    pub money_lasts_to_age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowTableRow {
    pub scenario_id: String,
    pub scenario_name: String,
    pub results: Vec<CashflowCell>,
}

impl CashflowTableRow {
    pub fn age_for(&self, assumption_id: &str) -> Option<u32> {
        self.results
            .iter()
            .find(|cell| cell.assumption_id == assumption_id)
            .map(|cell| cell.money_lasts_to_age)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCostTableRow {
    pub scenario_id: String,
    pub scenario_name: String,
    pub extra_cost: f64,
    pub is_baseline: bool,
}

/// A solver answer. `hits_cap` means no income inside the search range met the target,
/// so `value` is the range ceiling and should be shown as "> value".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedIncome {
    pub value: f64,
    pub hits_cap: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeThreshold {
    CoastFi,
    Surplus,
    Breakeven,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeColumns {
    pub partner2_working: SolvedIncome,
    pub partner2_break: SolvedIncome,
    pub paye_alternative: SolvedIncome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimumIncomeRow {
    pub threshold: IncomeThreshold,
    pub label: String,
    pub description: String,
    pub without_windfalls: IncomeColumns,
    pub with_windfalls: IncomeColumns,
}
