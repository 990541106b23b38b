use super::types::{FinancialInputs, InvestmentOption, ProjectionResult};

/// Projections never look further out than this many years.
pub const PROJECTION_YEARS_CAP: u32 = 30;

struct StrategySpec {
    name: &'static str,
    rate: f64,
    color: &'static str,
}

const STRATEGIES: [StrategySpec; 4] = [
    StrategySpec {
        name: "High Yield Savings",
        rate: 0.05,
        color: "#3B82F6",
    },
    StrategySpec {
        name: "Certificate of Deposit",
        rate: 0.045,
        color: "#8B5CF6",
    },
    StrategySpec {
        name: "Index Fund ETF",
        rate: 0.08,
        color: "#10B981",
    },
    StrategySpec {
        name: "Aggressive Growth",
        rate: 0.12,
        color: "#F59E0B",
    },
];

/// Number of projected years: capped at [`PROJECTION_YEARS_CAP`], clamped to 0
/// when the target age does not exceed the current age.
pub fn projection_horizon(inputs: &FinancialInputs) -> u32 {
    inputs
        .target_age
        .saturating_sub(inputs.current_age)
        .min(PROJECTION_YEARS_CAP)
}

/// Computes the tax- and inflation-adjusted growth series for each of the four
/// fixed strategies. Pure and deterministic: identical inputs produce
/// bit-identical output.
pub fn project(inputs: &FinancialInputs) -> Vec<InvestmentOption> {
    let horizon = projection_horizon(inputs);
    STRATEGIES
        .iter()
        .map(|strategy| InvestmentOption {
            name: strategy.name.to_string(),
            rate: strategy.rate,
            color: strategy.color.to_string(),
            projections: adjusted_return_series(inputs, strategy.rate, horizon),
        })
        .collect()
}

fn adjusted_return_series(
    inputs: &FinancialInputs,
    gross_rate: f64,
    years: u32,
) -> Vec<ProjectionResult> {
    let taxed_rate = gross_rate * (1.0 - inputs.tax_rate);
    let mut rows = compound_series(
        inputs.initial_investment,
        taxed_rate,
        years,
        inputs.growth_rate,
        inputs.current_age,
    );

    // Only the value is deflated; contributions and interest stay nominal.
    for row in &mut rows {
        row.value /= (1.0 + inputs.inflation_rate).powi(row.year as i32);
    }
    rows
}

fn compound_series(
    principal: f64,
    rate: f64,
    years: u32,
    annual_increase: f64,
    current_age: u32,
) -> Vec<ProjectionResult> {
    let mut rows = Vec::with_capacity(years as usize);
    let mut total_contributions = principal;

    for year in 1..=years {
        let adjusted_principal = principal * (1.0 + annual_increase).powi(year as i32 - 1);
        let value = adjusted_principal * (1.0 + rate).powi(year as i32);
        let interest = value - total_contributions;

        // The row records contributions as of the start of the year; the
        // year's increment lands after the row is emitted.
        rows.push(ProjectionResult {
            year,
            age: current_age + year,
            value,
            contributions: total_contributions,
            interest: interest.max(0.0),
        });

        total_contributions += adjusted_principal * annual_increase;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> FinancialInputs {
        FinancialInputs {
            goal_amount: 250_000.0,
            current_age: 25,
            target_age: 35,
            initial_investment: 10_000.0,
            monthly_income: 5_000.0,
            income_saving_rate: 0.20,
            growth_rate: 0.03,
            inflation_rate: 0.02,
            tax_rate: 0.15,
        }
    }

    #[test]
    fn produces_the_four_fixed_strategies_in_order() {
        let options = project(&sample_inputs());
        let expected = [
            ("High Yield Savings", 0.05, "#3B82F6"),
            ("Certificate of Deposit", 0.045, "#8B5CF6"),
            ("Index Fund ETF", 0.08, "#10B981"),
            ("Aggressive Growth", 0.12, "#F59E0B"),
        ];

        assert_eq!(options.len(), 4);
        for (option, (name, rate, color)) in options.iter().zip(expected) {
            assert_eq!(option.name, name);
            assert_approx(option.rate, rate);
            assert_eq!(option.color, color);
        }
    }

    #[test]
    fn each_strategy_covers_the_horizon_with_increasing_ages() {
        let inputs = sample_inputs();
        let options = project(&inputs);

        for option in &options {
            assert_eq!(option.projections.len(), 10);
            for (index, row) in option.projections.iter().enumerate() {
                let year = index as u32 + 1;
                assert_eq!(row.year, year);
                assert_eq!(row.age, inputs.current_age + year);
            }
        }
    }

    #[test]
    fn horizon_is_capped_at_thirty_years() {
        let mut inputs = sample_inputs();
        inputs.target_age = 100;

        assert_eq!(projection_horizon(&inputs), PROJECTION_YEARS_CAP);
        for option in project(&inputs) {
            assert_eq!(option.projections.len(), PROJECTION_YEARS_CAP as usize);
        }
    }

    #[test]
    fn target_age_at_or_below_current_age_yields_empty_series() {
        let mut inputs = sample_inputs();

        inputs.target_age = inputs.current_age;
        for option in project(&inputs) {
            assert!(option.projections.is_empty());
        }

        inputs.target_age = inputs.current_age - 5;
        assert_eq!(projection_horizon(&inputs), 0);
        for option in project(&inputs) {
            assert!(option.projections.is_empty());
        }
    }

    #[test]
    fn index_fund_first_year_matches_analytic_oracle() {
        let inputs = sample_inputs();
        let options = project(&inputs);
        let index_fund = options
            .iter()
            .find(|option| option.name == "Index Fund ETF")
            .expect("index fund strategy must exist");

        // taxed rate = 0.08 * (1 - 0.15); nominal = 10000 * (1 + taxed);
        // stored value deflated by one year of inflation.
        let taxed_rate = 0.08 * (1.0 - inputs.tax_rate);
        let nominal = inputs.initial_investment * (1.0 + taxed_rate);
        let expected_value = nominal / (1.0 + inputs.inflation_rate);

        let first = &index_fund.projections[0];
        assert_eq!(first.year, 1);
        assert_eq!(first.age, 26);
        assert!(first.value.is_finite() && first.value > 0.0);
        assert_approx(first.value, expected_value);
        assert_approx(first.contributions, inputs.initial_investment);
        assert_approx(first.interest, nominal - inputs.initial_investment);
    }

    #[test]
    fn second_year_tracks_contribution_growth() {
        let inputs = sample_inputs();
        let options = project(&inputs);
        let index_fund = &options[2];

        let taxed_rate = 0.08 * (1.0 - inputs.tax_rate);
        let adjusted_principal = inputs.initial_investment * (1.0 + inputs.growth_rate);
        let nominal = adjusted_principal * (1.0 + taxed_rate).powi(2);
        let contributions =
            inputs.initial_investment + inputs.initial_investment * inputs.growth_rate;

        let second = &index_fund.projections[1];
        assert_eq!(second.age, 27);
        assert_approx(second.value, nominal / (1.0 + inputs.inflation_rate).powi(2));
        assert_approx(second.contributions, contributions);
        assert_approx(second.interest, nominal - contributions);
    }

    #[test]
    fn projection_is_deterministic() {
        let inputs = sample_inputs();
        let first = project(&inputs);
        let second = project(&inputs);
        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_growth_rate_never_decreases_values(
            current_age in 18u32..60,
            span in 1u32..40,
            principal in 1u32..1_000_000,
            growth_bp in 0u32..1200,
            growth_delta_bp in 1u32..1200,
            inflation_bp in 0u32..600,
            tax_bp in 0u32..5000
        ) {
            let mut inputs = FinancialInputs {
                goal_amount: 100_000.0,
                current_age,
                target_age: current_age + span,
                initial_investment: principal as f64,
                monthly_income: 4_000.0,
                income_saving_rate: 0.2,
                growth_rate: growth_bp as f64 / 10_000.0,
                inflation_rate: inflation_bp as f64 / 10_000.0,
                tax_rate: tax_bp as f64 / 10_000.0,
            };

            let baseline = project(&inputs);
            inputs.growth_rate = (growth_bp + growth_delta_bp) as f64 / 10_000.0;
            let raised = project(&inputs);

            for (lo, hi) in baseline.iter().zip(raised.iter()) {
                for (row_lo, row_hi) in lo.projections.iter().zip(hi.projections.iter()) {
                    prop_assert!(row_hi.value >= row_lo.value - 1e-9);
                }
            }
        }

        #[test]
        fn prop_inflation_strictly_deflates_every_year(
            current_age in 18u32..60,
            span in 1u32..40,
            principal in 1u32..1_000_000,
            growth_bp in 0u32..1200,
            inflation_bp in 0u32..600,
            inflation_delta_bp in 1u32..600,
            tax_bp in 0u32..5000
        ) {
            let mut inputs = FinancialInputs {
                goal_amount: 100_000.0,
                current_age,
                target_age: current_age + span,
                initial_investment: principal as f64,
                monthly_income: 4_000.0,
                income_saving_rate: 0.2,
                growth_rate: growth_bp as f64 / 10_000.0,
                inflation_rate: inflation_bp as f64 / 10_000.0,
                tax_rate: tax_bp as f64 / 10_000.0,
            };

            let baseline = project(&inputs);
            inputs.inflation_rate = (inflation_bp + inflation_delta_bp) as f64 / 10_000.0;
            let inflated = project(&inputs);

            for (lo, hi) in baseline.iter().zip(inflated.iter()) {
                for (row_lo, row_hi) in lo.projections.iter().zip(hi.projections.iter()) {
                    prop_assert!(row_hi.value < row_lo.value);
                }
            }
        }

        #[test]
        fn prop_series_shape_is_consistent(
            current_age in 18u32..80,
            target_age in 0u32..110,
            principal in 0u32..2_000_000,
            growth_bp in 0u32..1500,
            inflation_bp in 0u32..800,
            tax_bp in 0u32..9000
        ) {
            let inputs = FinancialInputs {
                goal_amount: 250_000.0,
                current_age,
                target_age,
                initial_investment: principal as f64,
                monthly_income: 4_000.0,
                income_saving_rate: 0.2,
                growth_rate: growth_bp as f64 / 10_000.0,
                inflation_rate: inflation_bp as f64 / 10_000.0,
                tax_rate: tax_bp as f64 / 10_000.0,
            };

            let options = project(&inputs);
            let horizon = projection_horizon(&inputs) as usize;
            prop_assert!(options.len() == 4);

            for option in &options {
                prop_assert!(option.projections.len() == horizon);
                let mut previous_contributions = f64::NEG_INFINITY;
                for (index, row) in option.projections.iter().enumerate() {
                    prop_assert!(row.year == index as u32 + 1);
                    prop_assert!(row.age == current_age + row.year);
                    prop_assert!(row.value.is_finite());
                    prop_assert!(row.interest >= 0.0);
                    prop_assert!(row.contributions >= previous_contributions);
                    previous_contributions = row.contributions;
                }
            }
        }

        #[test]
        fn prop_project_is_idempotent(
            current_age in 18u32..70,
            span in 0u32..45,
            principal in 0u32..1_000_000,
            growth_bp in 0u32..1500,
            inflation_bp in 0u32..800,
            tax_bp in 0u32..9000
        ) {
            let inputs = FinancialInputs {
                goal_amount: 250_000.0,
                current_age,
                target_age: current_age + span,
                initial_investment: principal as f64,
                monthly_income: 4_000.0,
                income_saving_rate: 0.2,
                growth_rate: growth_bp as f64 / 10_000.0,
                inflation_rate: inflation_bp as f64 / 10_000.0,
                tax_rate: tax_bp as f64 / 10_000.0,
            };

            prop_assert!(project(&inputs) == project(&inputs));
        }
    }
}
