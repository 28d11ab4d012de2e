use super::tax::compute_paye_tax;
use super::types::{HeadlineMetrics, HouseholdConfig, HouseholdSnapshot};

pub const HEADLINE_RETURN_RATE: f64 = 0.05;
const BUSINESS_TAX_ESTIMATE_RATE: f64 = 0.30;
const YEARS_SEARCH_MAX: f64 = 50.0;
const YEARS_SEARCH_TOLERANCE: f64 = 0.1;
const UNREACHABLE_YEARS: u32 = 99;
const RUNWAY_CAP_YEARS: u32 = 100;

/// Scales a year-to-date figure to a full year from the snapshot month.
pub fn annualize_ytd(ytd: f64, month: u32) -> f64 {
    if month == 0 {
        return ytd;
    }
    ytd / month as f64 * 12.0
}

/// Quick estimate of the household's yearly savings from year-to-date flows. Business
/// revenue takes a flat 30% tax haircut; employment income goes through PAYE.
pub fn estimate_annual_savings(snapshot: &HouseholdSnapshot, config: &HouseholdConfig) -> f64 {
    let month = snapshot.month();
    let partner2_net = if snapshot.partner2_income_ytd > 0.0 {
        annualize_ytd(snapshot.partner2_income_ytd, month)
    } else {
        config.partner2_salary.net_annual()
    };
    let partner1_income = annualize_ytd(snapshot.business_revenue_ytd, month);
    let taxes = if config.partner1_income.is_business() {
        partner1_income * BUSINESS_TAX_ESTIMATE_RATE
    } else {
        compute_paye_tax(partner1_income)
    };
    let expenses = annualize_ytd(snapshot.total_expenses_ytd, month);

    partner1_income + partner2_net - taxes - expenses
}

fn future_value(present: f64, yearly_saving: f64, rate: f64, years: f64) -> f64 {
    if rate == 0.0 {
        return present + yearly_saving * years;
    }
    let growth = (1.0 + rate).powf(years);
    present * growth + yearly_saving * (growth - 1.0) / rate
}

/// Whole years until `current` grows to `target` with `yearly_saving` added each year.
/// Returns 0 when already there, 99 when it can never get there, and at most 50.
pub fn years_to_target(current: f64, target: f64, yearly_saving: f64, rate: f64) -> u32 {
    if current >= target {
        return 0;
    }
    if yearly_saving <= 0.0 && rate <= 0.0 {
        return UNREACHABLE_YEARS;
    }

    let mut lo = 0.0;
    let mut hi = YEARS_SEARCH_MAX;
    while hi - lo > YEARS_SEARCH_TOLERANCE {
        let mid = (lo + hi) * 0.5;
        if future_value(current, yearly_saving, rate, mid) >= target {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi.ceil() as u32
}

/// Years the assets last if earning stopped today, capped at 100.
pub fn runway_years(assets: f64, annual_expenses: f64, rate: f64) -> u32 {
    if annual_expenses <= 0.0 {
        return RUNWAY_CAP_YEARS;
    }
    let mut remaining = assets;
    let mut years = 0;
    while remaining > 0.0 && years < RUNWAY_CAP_YEARS {
        remaining = remaining * (1.0 + rate) - annual_expenses;
        years += 1;
    }
    years
}

/// Glance-level figures for the dashboard header. These use the snapshot's actual
/// spending and a fixed 5% return, so they can disagree with the full projections.
pub fn calculate_headline_metrics(
    snapshot: &HouseholdSnapshot,
    previous: Option<&HouseholdSnapshot>,
    config: &HouseholdConfig,
) -> HeadlineMetrics {
    let net_worth = snapshot.total;
    let previous_net_worth = previous.map_or(net_worth, |p| p.total);

    let liquid_assets = snapshot.cash_and_wrappers();
    let business_assets = snapshot.business_holdings();
    let pension_assets = snapshot.pensions;
    let property_equity = snapshot.house_equity;

    let annual_expenses = annualize_ytd(snapshot.total_expenses_ytd, snapshot.month());
    let fi_target = config.fi_target.resolve(annual_expenses);
    let fi_progress = if fi_target > 0.0 {
        net_worth / fi_target
    } else {
        0.0
    };

    let investable = liquid_assets + business_assets;
    let time_to_fi = years_to_target(
        investable,
        fi_target - pension_assets - property_equity,
        estimate_annual_savings(snapshot, config),
        HEADLINE_RETURN_RATE,
    );
    let runway = runway_years(investable, annual_expenses, HEADLINE_RETURN_RATE);

    HeadlineMetrics {
        net_worth,
        net_worth_change: net_worth - previous_net_worth,
        net_worth_change_percent: if previous_net_worth > 0.0 {
            (net_worth - previous_net_worth) / previous_net_worth * 100.0
        } else {
            0.0
        },
        fi_target,
        fi_progress,
        time_to_fi,
        runway,
        liquid_assets,
        pension_assets,
        business_assets,
        property_equity,
    }
}
