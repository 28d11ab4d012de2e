use super::types::{ExtractionResult, InvestmentExitNet};

// UK 2024/25 rates. Each band table is (upper limit, rate), applied cumulatively.
const PERSONAL_ALLOWANCE: f64 = 12_570.0;
const ALLOWANCE_TAPER_START: f64 = 100_000.0;
const INCOME_TAX_BANDS: [(f64, f64); 3] = [
    (37_700.0, 0.20),
    (125_140.0, 0.40),
    (f64::INFINITY, 0.45),
];
const EMPLOYEE_NI_BANDS: [(f64, f64); 3] = [
    (12_570.0, 0.0),
    (50_270.0, 0.12),
    (f64::INFINITY, 0.02),
];
const EMPLOYER_NI_BANDS: [(f64, f64); 2] = [(9_100.0, 0.0), (f64::INFINITY, 0.138)];
const DIVIDEND_ALLOWANCE: f64 = 500.0;
const DIVIDEND_TAX_BANDS: [(f64, f64); 3] = [
    (37_700.0, 0.0875),
    (125_140.0, 0.3375),
    (f64::INFINITY, 0.3935),
];
const STAMP_DUTY_BANDS: [(f64, f64); 4] = [
    (250_000.0, 0.0),
    (925_000.0, 0.05),
    (1_500_000.0, 0.10),
    (f64::INFINITY, 0.12),
];

const DIRECTOR_SALARY: f64 = 12_570.0;
const SMALL_PROFITS_RATE: f64 = 0.19;
const MAIN_RATE: f64 = 0.25;
const SMALL_PROFITS_LIMIT: f64 = 50_000.0;
const MAIN_RATE_LIMIT: f64 = 250_000.0;
const MARGINAL_RELIEF_FRACTION: f64 = 0.015;
const EXIT_GAIN_TAX_RATE: f64 = 0.25;

const GROSS_SEARCH_TOLERANCE: f64 = 100.0;

fn banded_tax(amount: f64, bands: &[(f64, f64)]) -> f64 {
    let amount = amount.max(0.0);
    let mut lower = 0.0;
    let mut tax = 0.0;
    for &(upper, rate) in bands {
        if amount <= lower {
            break;
        }
        tax += (amount.min(upper) - lower) * rate;
        lower = upper;
    }
    tax
}

fn personal_allowance(gross: f64) -> f64 {
    if gross > ALLOWANCE_TAPER_START {
        (PERSONAL_ALLOWANCE - (gross - ALLOWANCE_TAPER_START) / 2.0).max(0.0)
    } else {
        PERSONAL_ALLOWANCE
    }
}

pub fn income_tax(gross: f64) -> f64 {
    let gross = gross.max(0.0);
    let taxable = (gross - personal_allowance(gross)).max(0.0);
    banded_tax(taxable, &INCOME_TAX_BANDS)
}

pub fn employee_national_insurance(gross: f64) -> f64 {
    banded_tax(gross, &EMPLOYEE_NI_BANDS)
}

pub fn employer_national_insurance(salary: f64) -> f64 {
    banded_tax(salary, &EMPLOYER_NI_BANDS)
}

/// Income tax plus employee NI on a PAYE salary.
pub fn compute_paye_tax(gross: f64) -> f64 {
    income_tax(gross) + employee_national_insurance(gross)
}

pub fn corporation_tax(profit: f64) -> f64 {
    if profit <= 0.0 {
        return 0.0;
    }
    if profit <= SMALL_PROFITS_LIMIT {
        return profit * SMALL_PROFITS_RATE;
    }
    if profit >= MAIN_RATE_LIMIT {
        return profit * MAIN_RATE;
    }

    let relief = (MAIN_RATE_LIMIT - profit) * (profit - SMALL_PROFITS_LIMIT)
        / (MAIN_RATE_LIMIT - SMALL_PROFITS_LIMIT)
        * MARGINAL_RELIEF_FRACTION;
    profit * MAIN_RATE - relief
}

/// Dividends are assumed to start in the basic band: the director's salary has
/// already used the personal allowance.
pub fn dividend_tax(dividends: f64) -> f64 {
    banded_tax(dividends - DIVIDEND_ALLOWANCE, &DIVIDEND_TAX_BANDS)
}

/// Salary fixed at the NI primary threshold, everything else paid out as dividends.
/// This is the common director heuristic, not a search over salary/dividend splits.
pub fn compute_optimal_extraction(gross_revenue: f64) -> ExtractionResult {
    let salary = DIRECTOR_SALARY;
    let employer_ni = employer_national_insurance(salary);
    let profits = (gross_revenue - salary - employer_ni).max(0.0);

    let corporation_tax = corporation_tax(profits);
    let dividends = profits - corporation_tax;

    let employee_ni = employee_national_insurance(salary);
    let income_tax = income_tax(salary);
    let dividend_tax = dividend_tax(dividends);

    let total_tax = corporation_tax + income_tax + employee_ni + employer_ni + dividend_tax;
    let net_income = gross_revenue - total_tax;
    let effective_rate = if gross_revenue > 0.0 {
        total_tax / gross_revenue
    } else {
        0.0
    };

    ExtractionResult {
        salary,
        dividends,
        corporation_tax,
        income_tax,
        national_insurance: employee_ni + employer_ni,
        dividend_tax,
        total_tax,
        net_income,
        effective_rate,
    }
}

fn search_gross_for_net(target_net: f64, net_of: impl Fn(f64) -> f64) -> f64 {
    let target_net = target_net.max(0.0);
    let mut lo = target_net;
    let mut hi = target_net * 2.0;
    while hi - lo > GROSS_SEARCH_TOLERANCE {
        let mid = (lo + hi) * 0.5;
        if net_of(mid) >= target_net {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi.ceil()
}

/// PAYE gross salary whose take-home pay reaches `target_net`, to within 100.
pub fn compute_gross_from_net(target_net: f64) -> f64 {
    search_gross_for_net(target_net, |gross| gross - compute_paye_tax(gross))
}

/// Company revenue whose extraction net income reaches `target_net`, to within 100.
pub fn compute_business_gross_for_net(target_net: f64) -> f64 {
    search_gross_for_net(target_net, |gross| {
        compute_optimal_extraction(gross).net_income
    })
}

/// Residential rates for a buyer who already owns a home.
pub fn compute_stamp_duty(price: f64) -> f64 {
    banded_tax(price, &STAMP_DUTY_BANDS)
}

pub fn compute_investment_exit_net(gross_proceeds: f64, cost_basis: f64) -> InvestmentExitNet {
    let gain = gross_proceeds - cost_basis;
    let corporation_tax = gain.max(0.0) * EXIT_GAIN_TAX_RATE;
    let net_proceeds = gross_proceeds - corporation_tax;
    // The cost basis is already counted in the snapshot's investment assets.
    let additional_value = net_proceeds - cost_basis;

    InvestmentExitNet {
        gross_proceeds,
        gain,
        corporation_tax,
        net_proceeds,
        additional_value,
    }
}
