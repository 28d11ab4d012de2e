use super::solver::DEFAULT_RETIREMENT_AGE;
use super::types::{AssumptionSet, HouseholdConfig, ScenarioDefinition};

pub const BASELINE_ID: &str = "baseline";
pub const PARTNER_BREAK_ID: &str = "partner2-break";
pub const EARLIER_RETIRE_ID: &str = "earlier-retire";
pub const HOUSE_UPGRADE_ID: &str = "house-upgrade";
pub const UNIVERSITY_ID: &str = "education-supported";

pub const NO_WINDFALLS_ID: &str = "5-none";
pub const ALL_WINDFALLS_ID: &str = "5-both";

const EARLY_RETIREMENT_YEARS: u32 = 5;
const HOUSE_MOVE_DELAY_YEARS: i32 = 2;
const INFLATION: f64 = 0.025;
const SCHOOL_FEE_INFLATION: f64 = 0.05;

pub fn includes_partner_break(config: &HouseholdConfig) -> bool {
    config.partner2_gross_annual() > 0.0
}

/// A move only makes sense when there is a budget and it differs from today's house.
pub fn includes_house_upgrade(config: &HouseholdConfig) -> bool {
    let upgrade = &config.house_upgrade;
    upgrade.enabled && upgrade.budget > 0.0 && upgrade.budget != upgrade.current_value
}

pub fn includes_university(config: &HouseholdConfig) -> bool {
    !config.children().is_empty()
}

/// Builds the scenario list shown to the user. The baseline always comes first and
/// survives the enabled-scenario filter.
pub fn generate_scenarios(config: &HouseholdConfig, plan_year: i32) -> Vec<ScenarioDefinition> {
    let partner1_until = config
        .partner1_works_until_age
        .unwrap_or(DEFAULT_RETIREMENT_AGE);
    let partner2_until = if config.partner2_gross_annual() > 0.0 {
        config
            .partner2_works_until_age
            .unwrap_or(DEFAULT_RETIREMENT_AGE)
    } else {
        0
    };
    let has_children = includes_university(config);

    let base = ScenarioDefinition {
        id: BASELINE_ID.to_string(),
        name: "Baseline (as entered)".to_string(),
        short_name: "Baseline".to_string(),
        partner1_works_until_age: partner1_until,
        partner2_works_until_age: partner2_until,
        partner1_annual_revenue: config.partner1_income.annual_amount(),
        partner2_break_years: 0,
        partner2_break_start_year: 0,
        include_house_upgrade: false,
        house_upgrade_year: 0,
        include_university: has_children,
    };
    let variant = |id: &str, name: String, short_name: &str| ScenarioDefinition {
        id: id.to_string(),
        name,
        short_name: short_name.to_string(),
        ..base.clone()
    };

    let mut scenarios = vec![base.clone()];

    if includes_partner_break(config) {
        scenarios.push(ScenarioDefinition {
            partner2_break_years: 1,
            partner2_break_start_year: plan_year.saturating_add(1),
            ..variant(
                PARTNER_BREAK_ID,
                format!("{} takes 1 year off", config.partner2_name),
                "Partner break",
            )
        });
    }

    let next_birthday_age = config.partner1_age_in(plan_year).saturating_add(1);
    scenarios.push(ScenarioDefinition {
        partner1_works_until_age: partner1_until
            .saturating_sub(EARLY_RETIREMENT_YEARS)
            .max(next_birthday_age),
        ..variant(
            EARLIER_RETIRE_ID,
            format!(
                "{} retires {EARLY_RETIREMENT_YEARS} years earlier",
                config.partner1_name
            ),
            "Early retire",
        )
    });

    if includes_house_upgrade(config) {
        scenarios.push(ScenarioDefinition {
            include_house_upgrade: true,
            house_upgrade_year: plan_year.saturating_add(HOUSE_MOVE_DELAY_YEARS),
            ..variant(
                HOUSE_UPGRADE_ID,
                "House move / upgrade".to_string(),
                "House move",
            )
        });
    }

    if has_children {
        scenarios.push(ScenarioDefinition {
            include_university: true,
            ..variant(
                UNIVERSITY_ID,
                "Pay all university costs".to_string(),
                "University",
            )
        });
    }

    if config.enabled_scenario_ids.is_empty() {
        return scenarios;
    }
    scenarios
        .into_iter()
        .filter(|s| s.id == BASELINE_ID || config.enabled_scenario_ids.contains(&s.id))
        .collect()
}

/// Real-return levels crossed with every windfall combination.
pub fn default_assumptions() -> Vec<AssumptionSet> {
    let windfalls = [
        ("none", "No Windfalls", false, false),
        ("inh", "+ Inheritance", true, false),
        ("invest", "+ Investment", false, true),
        ("both", "+ Both", true, true),
    ];

    [3u32, 5]
        .into_iter()
        .flat_map(|percent| {
            windfalls
                .into_iter()
                .map(move |(suffix, label, inheritance, exit)| AssumptionSet {
                    id: format!("{percent}-{suffix}"),
                    name: format!("{percent}% {label}"),
                    real_return_rate: percent as f64 / 100.0,
                    inflation_rate: INFLATION,
                    school_fee_inflation: SCHOOL_FEE_INFLATION,
                    include_inheritance: inheritance,
                    include_investment_exit: exit,
                })
        })
        .collect()
}

pub fn assumption_by_id(id: &str) -> Option<AssumptionSet> {
    default_assumptions().into_iter().find(|a| a.id == id)
}

/// Drops assumption sets that switch on a windfall the household has not configured,
/// since they would duplicate the no-windfall column.
pub fn active_assumptions(config: &HouseholdConfig) -> Vec<AssumptionSet> {
    let has_inheritance = config.inheritance.amount > 0.0;
    let has_exit = config.investment_exit.gross_proceeds > 0.0;
    default_assumptions()
        .into_iter()
        .filter(|a| {
            (!a.include_inheritance || has_inheritance) && (!a.include_investment_exit || has_exit)
        })
        .collect()
}
