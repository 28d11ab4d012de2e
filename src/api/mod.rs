use axum::{
    Router,
    body::Bytes,
    extract::{Json, Query, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    AssumptionSet, Dashboard, FiTarget, HouseholdConfig, HouseholdSnapshot, MAX_CHILDREN,
    Partner1Income, Partner2Salary, ScenarioDefinition, SnapshotHistory, assumption_by_id,
    calculate_cashflow_table, calculate_dashboard, calculate_headline_metrics,
    calculate_minimum_income_table, calculate_scenario_cost_table,
    compute_business_gross_for_net, compute_gross_from_net, compute_investment_exit_net,
    compute_optimal_extraction, compute_paye_tax, compute_stamp_duty, generate_scenarios,
    run_scenario_to_exhaustion,
};

const DEFAULT_SCENARIO_ID: &str = "baseline";
const DEFAULT_ASSUMPTION_ID: &str = "5-none";
const MAX_AGE: i64 = 120;
const MAX_UNIVERSITY_YEARS: i64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("invalid JSON payload: {0}")]
    Payload(String),
    #[error("invalid query string: {0}")]
    Query(String),
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("at most {max} children are supported")]
    TooManyChildren { max: usize },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("{field} must not be after the plan year {plan_year}")]
    BornAfterPlanYear { field: &'static str, plan_year: i32 },
    #[error("realReturnRate for assumption set '{0}' must be > -100%")]
    ReturnRate(String),
    #[error("unknown scenario id '{0}'")]
    UnknownScenario(String),
    #[error("unknown assumption id '{0}'")]
    UnknownAssumption(String),
    #[error("at least one snapshot is required")]
    NoSnapshots,
}

/// Household settings as sent by a form: every field optional, merged over defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    partner1_name: Option<String>,
    partner2_name: Option<String>,
    partner1_birth_year: Option<i32>,
    partner2_birth_year: Option<i32>,
    child_birth_years: Option<Vec<i32>>,

    partner1_income: Option<Partner1Income>,
    partner2_salary: Option<Partner2Salary>,

    personal_expenses_monthly: Option<f64>,
    business_expenses_monthly: Option<f64>,
    school_fees_enabled: Option<bool>,
    school_fee_per_child: Option<f64>,
    fi_target: Option<FiTarget>,

    partner1_works_until_age: Option<u32>,
    partner2_works_until_age: Option<u32>,

    inheritance_amount: Option<f64>,
    inheritance_age: Option<u32>,
    investment_exit_gross: Option<f64>,
    investment_exit_cost_basis: Option<f64>,
    investment_exit_age: Option<u32>,

    house_upgrade_enabled: Option<bool>,
    house_upgrade_budget: Option<f64>,
    current_house_value: Option<f64>,

    university_enabled: Option<bool>,
    university_annual_cost: Option<f64>,
    university_years: Option<u32>,

    enabled_scenario_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanPayload {
    snapshot: HouseholdSnapshot,
    #[serde(default)]
    previous_snapshot: Option<HouseholdSnapshot>,
    #[serde(default)]
    config: ConfigPatch,
    #[serde(default)]
    scenarios: Option<Vec<ScenarioDefinition>>,
    #[serde(default)]
    assumptions: Option<Vec<AssumptionSet>>,
    #[serde(default)]
    plan_year: Option<i32>,
    #[serde(default)]
    scenario_id: Option<String>,
    #[serde(default)]
    assumption_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    snapshots: Vec<HouseholdSnapshot>,
    #[serde(default)]
    config: ConfigPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExitPayload {
    gross_proceeds: f64,
    #[serde(default)]
    cost_basis: f64,
}

#[derive(Debug)]
struct PlanRequest {
    snapshot: HouseholdSnapshot,
    previous_snapshot: Option<HouseholdSnapshot>,
    config: HouseholdConfig,
    scenarios: Option<Vec<ScenarioDefinition>>,
    assumptions: Option<Vec<AssumptionSet>>,
    plan_year: i32,
    scenario_id: String,
    assumption_id: String,
}

#[derive(Debug, Deserialize)]
struct GrossQuery {
    gross: f64,
}

#[derive(Debug, Deserialize)]
struct NetQuery {
    net: f64,
}

#[derive(Debug, Deserialize)]
struct RevenueQuery {
    revenue: f64,
}

#[derive(Debug, Deserialize)]
struct PriceQuery {
    price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayeResponse {
    gross: f64,
    tax: f64,
    net: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GrossForNetResponse {
    net: f64,
    gross: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StampDutyResponse {
    price: f64,
    stamp_duty: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn apply_patch(base: &HouseholdConfig, patch: ConfigPatch) -> HouseholdConfig {
    let mut config = base.clone();

    if let Some(v) = patch.partner1_name {
        config.partner1_name = v;
    }
    if let Some(v) = patch.partner2_name {
        config.partner2_name = v;
    }
    if let Some(v) = patch.partner1_birth_year {
        config.partner1_birth_year = v;
    }
    if let Some(v) = patch.partner2_birth_year {
        config.partner2_birth_year = v;
    }
    if let Some(v) = patch.child_birth_years {
        config.child_birth_years = v;
    }

    if let Some(v) = patch.partner1_income {
        config.partner1_income = v;
    }
    if let Some(v) = patch.partner2_salary {
        config.partner2_salary = v;
    }

    if let Some(v) = patch.personal_expenses_monthly {
        config.personal_expenses_monthly = v;
    }
    if let Some(v) = patch.business_expenses_monthly {
        config.business_expenses_monthly = v;
    }
    if let Some(v) = patch.school_fees_enabled {
        config.school_fees.enabled = v;
    }
    if let Some(v) = patch.school_fee_per_child {
        config.school_fees.annual_fee_per_child = v;
    }
    if let Some(v) = patch.fi_target {
        config.fi_target = v;
    }

    if let Some(v) = patch.partner1_works_until_age {
        config.partner1_works_until_age = Some(v);
    }
    if let Some(v) = patch.partner2_works_until_age {
        config.partner2_works_until_age = Some(v);
    }

    if let Some(v) = patch.inheritance_amount {
        config.inheritance.amount = v;
    }
    if let Some(v) = patch.inheritance_age {
        config.inheritance.partner1_age = v;
    }
    if let Some(v) = patch.investment_exit_gross {
        config.investment_exit.gross_proceeds = v;
    }
    if let Some(v) = patch.investment_exit_cost_basis {
        config.investment_exit.cost_basis = v;
    }
    if let Some(v) = patch.investment_exit_age {
        config.investment_exit.partner1_age = v;
    }

    if let Some(v) = patch.house_upgrade_enabled {
        config.house_upgrade.enabled = v;
    }
    if let Some(v) = patch.house_upgrade_budget {
        config.house_upgrade.budget = v;
    }
    if let Some(v) = patch.current_house_value {
        config.house_upgrade.current_value = v;
    }

    if let Some(v) = patch.university_enabled {
        config.university.enabled = v;
    }
    if let Some(v) = patch.university_annual_cost {
        config.university.annual_cost = v;
    }
    if let Some(v) = patch.university_years {
        config.university.years = v;
    }

    if let Some(v) = patch.enabled_scenario_ids {
        config.enabled_scenario_ids = v;
    }

    config
}

fn check_amount(field: &'static str, value: f64) -> Result<(), RequestError> {
    if !value.is_finite() {
        return Err(RequestError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(RequestError::Negative { field });
    }
    Ok(())
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), RequestError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RequestError::OutOfRange { field, min, max })
    }
}

pub fn validate_config(config: &HouseholdConfig, plan_year: i32) -> Result<(), RequestError> {
    let (income_field, income) = match config.partner1_income {
        Partner1Income::Business { revenue } => ("partner1Income.revenue", revenue),
        Partner1Income::Employed { salary } => ("partner1Income.salary", salary),
    };
    let salary = match config.partner2_salary {
        Partner2Salary::Gross { annual } | Partner2Salary::Net { annual } => annual,
    };
    let fi_target = match config.fi_target {
        FiTarget::Multiplier(v) | FiTarget::Amount(v) => v,
    };

    let amounts = [
        (income_field, income),
        ("partner2Salary.annual", salary),
        ("personalExpensesMonthly", config.personal_expenses_monthly),
        ("businessExpensesMonthly", config.business_expenses_monthly),
        ("schoolFeePerChild", config.school_fees.annual_fee_per_child),
        ("fiTarget.value", fi_target),
        ("inheritanceAmount", config.inheritance.amount),
        ("investmentExitGross", config.investment_exit.gross_proceeds),
        ("investmentExitCostBasis", config.investment_exit.cost_basis),
        ("houseUpgradeBudget", config.house_upgrade.budget),
        ("currentHouseValue", config.house_upgrade.current_value),
        ("universityAnnualCost", config.university.annual_cost),
    ];
    for (field, value) in amounts {
        check_amount(field, value)?;
    }

    if config.child_birth_years.len() > MAX_CHILDREN {
        return Err(RequestError::TooManyChildren { max: MAX_CHILDREN });
    }
    if config.partner1_birth_year > plan_year {
        return Err(RequestError::BornAfterPlanYear {
            field: "partner1BirthYear",
            plan_year,
        });
    }
    if config.partner2_birth_year > plan_year {
        return Err(RequestError::BornAfterPlanYear {
            field: "partner2BirthYear",
            plan_year,
        });
    }

    let plan_year = i64::from(plan_year);
    let years = [
        ("partner1BirthYear", config.partner1_birth_year, plan_year - MAX_AGE, plan_year),
        ("partner2BirthYear", config.partner2_birth_year, plan_year - MAX_AGE, plan_year),
    ];
    for (field, year, min, max) in years {
        check_range(field, i64::from(year), min, max)?;
    }
    for &year in &config.child_birth_years {
        check_range(
            "childBirthYears",
            i64::from(year),
            plan_year - MAX_AGE,
            plan_year + MAX_AGE,
        )?;
    }

    let ages = [
        ("partner1WorksUntilAge", config.partner1_works_until_age),
        ("partner2WorksUntilAge", config.partner2_works_until_age),
        ("inheritanceAge", Some(config.inheritance.partner1_age)),
        ("investmentExitAge", Some(config.investment_exit.partner1_age)),
    ];
    for (field, age) in ages {
        if let Some(age) = age {
            check_range(field, i64::from(age), 0, MAX_AGE)?;
        }
    }
    check_range(
        "universityYears",
        i64::from(config.university.years),
        0,
        MAX_UNIVERSITY_YEARS,
    )
}

fn validate_scenarios(
    scenarios: &[ScenarioDefinition],
    plan_year: i32,
) -> Result<(), RequestError> {
    let plan_year = i64::from(plan_year);
    for scenario in scenarios {
        check_amount(
            "scenarios.partner1AnnualRevenue",
            scenario.partner1_annual_revenue,
        )?;
        let ages = [
            ("scenarios.partner1WorksUntilAge", scenario.partner1_works_until_age),
            ("scenarios.partner2WorksUntilAge", scenario.partner2_works_until_age),
            ("scenarios.partner2BreakYears", scenario.partner2_break_years),
        ];
        for (field, age) in ages {
            check_range(field, i64::from(age), 0, MAX_AGE)?;
        }
        if scenario.partner2_break_years > 0 {
            check_range(
                "scenarios.partner2BreakStartYear",
                i64::from(scenario.partner2_break_start_year),
                plan_year - MAX_AGE,
                plan_year + MAX_AGE,
            )?;
        }
        if scenario.include_house_upgrade {
            check_range(
                "scenarios.houseUpgradeYear",
                i64::from(scenario.house_upgrade_year),
                plan_year - MAX_AGE,
                plan_year + MAX_AGE,
            )?;
        }
    }
    Ok(())
}

fn validate_snapshot(snapshot: &HouseholdSnapshot) -> Result<(), RequestError> {
    let values = [
        ("currentAccounts", snapshot.current_accounts),
        ("savingsAccounts", snapshot.savings_accounts),
        ("isas", snapshot.isas),
        ("pensions", snapshot.pensions),
        ("taxableAccounts", snapshot.taxable_accounts),
        ("houseEquity", snapshot.house_equity),
        ("businessAssets", snapshot.business_assets),
        ("investmentAssets", snapshot.investment_assets),
        ("total", snapshot.total),
        ("businessRevenueYtd", snapshot.business_revenue_ytd),
        ("partner2IncomeYtd", snapshot.partner2_income_ytd),
        ("personalExpensesYtd", snapshot.personal_expenses_ytd),
        ("businessExpensesYtd", snapshot.business_expenses_ytd),
        ("totalExpensesYtd", snapshot.total_expenses_ytd),
    ];
    for (field, value) in values {
        check_amount(field, value)?;
    }
    Ok(())
}

fn validate_assumptions(sets: &[AssumptionSet]) -> Result<(), RequestError> {
    for set in sets {
        if !set.real_return_rate.is_finite() || set.real_return_rate <= -1.0 {
            return Err(RequestError::ReturnRate(set.id.clone()));
        }
        if !set.inflation_rate.is_finite() || !set.school_fee_inflation.is_finite() {
            return Err(RequestError::NotFinite {
                field: "assumptions.inflationRate",
            });
        }
    }
    Ok(())
}

fn parse_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(body).map_err(|e| RequestError::Payload(e.to_string()))
}

fn plan_request_from_payload(payload: PlanPayload) -> Result<PlanRequest, RequestError> {
    let snapshot_year = payload.snapshot.year();
    let plan_year = payload.plan_year.unwrap_or(snapshot_year);
    check_range(
        "planYear",
        i64::from(plan_year),
        i64::from(snapshot_year) - MAX_AGE,
        i64::from(snapshot_year) + MAX_AGE,
    )?;
    let config = apply_patch(
        &HouseholdConfig::default_for_year(snapshot_year),
        payload.config,
    );

    validate_config(&config, plan_year)?;
    validate_snapshot(&payload.snapshot)?;
    if let Some(previous) = &payload.previous_snapshot {
        validate_snapshot(previous)?;
    }
    if let Some(sets) = &payload.assumptions {
        validate_assumptions(sets)?;
    }
    if let Some(scenarios) = &payload.scenarios {
        validate_scenarios(scenarios, plan_year)?;
    }

    Ok(PlanRequest {
        snapshot: payload.snapshot,
        previous_snapshot: payload.previous_snapshot,
        config,
        scenarios: payload.scenarios,
        assumptions: payload.assumptions,
        plan_year,
        scenario_id: payload
            .scenario_id
            .unwrap_or_else(|| DEFAULT_SCENARIO_ID.to_string()),
        assumption_id: payload
            .assumption_id
            .unwrap_or_else(|| DEFAULT_ASSUMPTION_ID.to_string()),
    })
}

fn plan_request_from_body(body: &[u8]) -> Result<PlanRequest, RequestError> {
    plan_request_from_payload(parse_payload(body)?)
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanRequest, RequestError> {
    plan_request_from_body(json.as_bytes())
}

fn resolve_scenario(request: &PlanRequest) -> Result<ScenarioDefinition, RequestError> {
    let generated;
    let candidates = match &request.scenarios {
        Some(list) if !list.is_empty() => list.as_slice(),
        _ => {
            generated = generate_scenarios(&request.config, request.plan_year);
            generated.as_slice()
        }
    };
    candidates
        .iter()
        .find(|s| s.id == request.scenario_id)
        .cloned()
        .ok_or_else(|| RequestError::UnknownScenario(request.scenario_id.clone()))
}

fn resolve_assumptions(request: &PlanRequest) -> Result<AssumptionSet, RequestError> {
    request
        .assumptions
        .iter()
        .flatten()
        .find(|a| a.id == request.assumption_id)
        .cloned()
        .or_else(|| assumption_by_id(&request.assumption_id))
        .ok_or_else(|| RequestError::UnknownAssumption(request.assumption_id.clone()))
}

pub fn dashboard_from_payload(payload: DashboardPayload) -> Result<Dashboard, RequestError> {
    let history = SnapshotHistory::from_snapshots(payload.snapshots);
    let latest = history.latest().ok_or(RequestError::NoSnapshots)?;
    let plan_year = latest.year();
    let config = apply_patch(&HouseholdConfig::default_for_year(plan_year), payload.config);

    validate_config(&config, plan_year)?;
    for snapshot in history.iter() {
        validate_snapshot(snapshot)?;
    }
    calculate_dashboard(&history, &config).ok_or(RequestError::NoSnapshots)
}

pub fn dashboard_from_json(json: &str) -> Result<Dashboard, RequestError> {
    dashboard_from_payload(parse_payload(json.as_bytes())?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/headline", post(headline_handler))
        .route("/api/cashflow", post(cashflow_handler))
        .route("/api/scenario-costs", post(scenario_costs_handler))
        .route("/api/minimum-income", post(minimum_income_handler))
        .route("/api/scenario", post(scenario_handler))
        .route("/api/dashboard", post(dashboard_handler))
        .route("/api/investment-exit", post(investment_exit_handler))
        .route("/api/tax/paye", get(paye_handler))
        .route("/api/tax/gross-from-net", get(gross_from_net_handler))
        .route(
            "/api/tax/business-gross-for-net",
            get(business_gross_for_net_handler),
        )
        .route("/api/tax/extraction", get(extraction_handler))
        .route("/api/tax/stamp-duty", get(stamp_duty_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fortress HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/tax/paye?gross=60000");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn headline_handler(body: Bytes) -> Response {
    let request = match plan_request_from_body(&body) {
        Ok(request) => request,
        Err(err) => return reject(err),
    };
    let metrics = calculate_headline_metrics(
        &request.snapshot,
        request.previous_snapshot.as_ref(),
        &request.config,
    );
    json_response(StatusCode::OK, metrics)
}

async fn cashflow_handler(body: Bytes) -> Response {
    let request = match plan_request_from_body(&body) {
        Ok(request) => request,
        Err(err) => return reject(err),
    };
    let rows = calculate_cashflow_table(
        &request.snapshot,
        &request.config,
        request.scenarios.as_deref(),
        request.assumptions.as_deref(),
        Some(request.plan_year),
    );
    json_response(StatusCode::OK, rows)
}

async fn scenario_costs_handler(body: Bytes) -> Response {
    let request = match plan_request_from_body(&body) {
        Ok(request) => request,
        Err(err) => return reject(err),
    };
    let rows = calculate_scenario_cost_table(
        &request.config,
        request.scenarios.as_deref(),
        Some(request.plan_year),
    );
    json_response(StatusCode::OK, rows)
}

async fn minimum_income_handler(body: Bytes) -> Response {
    let request = match plan_request_from_body(&body) {
        Ok(request) => request,
        Err(err) => return reject(err),
    };
    let rows = calculate_minimum_income_table(&request.snapshot, &request.config);
    json_response(StatusCode::OK, rows)
}

async fn scenario_handler(body: Bytes) -> Response {
    let resolved = plan_request_from_body(&body).and_then(|request| {
        let scenario = resolve_scenario(&request)?;
        let assumptions = resolve_assumptions(&request)?;
        Ok((request, scenario, assumptions))
    });
    let (request, scenario, assumptions) = match resolved {
        Ok(resolved) => resolved,
        Err(err) => return reject(err),
    };
    let result =
        run_scenario_to_exhaustion(&request.snapshot, &request.config, &scenario, &assumptions);
    json_response(StatusCode::OK, result)
}

async fn dashboard_handler(body: Bytes) -> Response {
    match parse_payload(&body).and_then(dashboard_from_payload) {
        Ok(dashboard) => json_response(StatusCode::OK, dashboard),
        Err(err) => reject(err),
    }
}

async fn investment_exit_handler(body: Bytes) -> Response {
    let payload = match parse_payload::<ExitPayload>(&body).and_then(|payload| {
        check_amount("grossProceeds", payload.gross_proceeds)?;
        check_amount("costBasis", payload.cost_basis)?;
        Ok(payload)
    }) {
        Ok(payload) => payload,
        Err(err) => return reject(err),
    };
    json_response(
        StatusCode::OK,
        compute_investment_exit_net(payload.gross_proceeds, payload.cost_basis),
    )
}

fn query_amount<Q>(
    query: Result<Query<Q>, QueryRejection>,
    field: &'static str,
    amount: impl FnOnce(&Q) -> f64,
) -> Result<f64, RequestError> {
    let Query(query) = query.map_err(|e| RequestError::Query(e.body_text()))?;
    let value = amount(&query);
    check_amount(field, value)?;
    Ok(value)
}

async fn paye_handler(query: Result<Query<GrossQuery>, QueryRejection>) -> Response {
    let gross = match query_amount(query, "gross", |q| q.gross) {
        Ok(gross) => gross,
        Err(err) => return reject(err),
    };
    let tax = compute_paye_tax(gross);
    json_response(
        StatusCode::OK,
        PayeResponse {
            gross,
            tax,
            net: gross - tax,
        },
    )
}

async fn gross_from_net_handler(query: Result<Query<NetQuery>, QueryRejection>) -> Response {
    let net = match query_amount(query, "net", |q| q.net) {
        Ok(net) => net,
        Err(err) => return reject(err),
    };
    json_response(
        StatusCode::OK,
        GrossForNetResponse {
            net,
            gross: compute_gross_from_net(net),
        },
    )
}

async fn business_gross_for_net_handler(
    query: Result<Query<NetQuery>, QueryRejection>,
) -> Response {
    let net = match query_amount(query, "net", |q| q.net) {
        Ok(net) => net,
        Err(err) => return reject(err),
    };
    json_response(
        StatusCode::OK,
        GrossForNetResponse {
            net,
            gross: compute_business_gross_for_net(net),
        },
    )
}

async fn extraction_handler(query: Result<Query<RevenueQuery>, QueryRejection>) -> Response {
    match query_amount(query, "revenue", |q| q.revenue) {
        Ok(revenue) => json_response(StatusCode::OK, compute_optimal_extraction(revenue)),
        Err(err) => reject(err),
    }
}

async fn stamp_duty_handler(query: Result<Query<PriceQuery>, QueryRejection>) -> Response {
    let price = match query_amount(query, "price", |q| q.price) {
        Ok(price) => price,
        Err(err) => return reject(err),
    };
    json_response(
        StatusCode::OK,
        StampDutyResponse {
            price,
            stamp_duty: compute_stamp_duty(price),
        },
    )
}

fn reject(err: RequestError) -> Response {
    warn!(error = %err, "rejected request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
